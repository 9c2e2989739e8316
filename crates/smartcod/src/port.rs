use std::{fs, path::Path, time::Duration};

use serialport::{SerialPortInfo, available_ports};
use smartcod_port::Port;
use smartcod_protocol::{Opcodes, SmartBox};

use crate::{Result, err::Error, options::Options};

const TIMEOUT: Duration = Duration::from_millis(2000);

/// Find `name` among the ports the OS knows about, ignoring case
pub fn find_port<'a>(name: &str, ports: &'a [SerialPortInfo]) -> Result<&'a SerialPortInfo> {
    ports
        .iter()
        .find(|p| p.port_name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::InvalidPort(name.to_owned()))
}

pub fn load_opcodes(path: &Path) -> Result<Opcodes> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            what: "Opcode table",
            path: path.to_owned(),
        });
    }

    Ok(fs::read_to_string(path)?.parse::<Opcodes>()?)
}

/// Open a session on the `-port` SmartBox. The port closes when the session drops.
pub fn open_session(options: &Options) -> Result<SmartBox<Port>> {
    let name = options.port.as_deref().ok_or(Error::MissingOption {
        option: "port",
        what: "SmartBox serial port",
    })?;
    let opcodes = load_opcodes(&options.opcodes)?;

    let ports = available_ports()?;
    let info = find_port(name, &ports)?;

    let port = serialport::new(&info.port_name, options.baud)
        .timeout(TIMEOUT)
        .open()?;

    Ok(SmartBox::new(port, opcodes))
}
