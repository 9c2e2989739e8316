use std::{
    collections::VecDeque,
    fs,
    io::{Write, stdout},
    path::Path,
};

use colored::Colorize;
use smartcod_patcher::{CodeImage, entry_offset};
use smartcod_protocol::{CallContext, SignatureCache};
use strum::EnumString;
use tempfile::NamedTempFile;

use crate::{
    Result,
    err::Error,
    log,
    options::Options,
    port::open_session,
    status,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    /// Build a COD file from a master and a difference file
    Build,
    /// Load and run a COD file
    Load,
    /// List the jobs resident on the SmartBox
    List,
    /// Reset the SmartBox
    Reset,
    /// Call a job
    Call,
}

fn require<'a, T: ?Sized>(
    value: Option<&'a T>,
    option: &'static str,
    what: &'static str,
) -> Result<&'a T> {
    value.ok_or(Error::MissingOption { option, what })
}

fn read_existing(path: &Path, what: &'static str) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            what,
            path: path.to_owned(),
        });
    }
    Ok(fs::read(path)?)
}

/// Replace `path` with `bytes` in one step; readers never see a partial file
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    Ok(())
}

pub fn build(options: &Options) -> Result<()> {
    let out = require(options.cod.as_deref(), "cod", "Output file")?;

    let master = CodeImage::from(read_existing(&options.master, "Master")?);
    let diff = CodeImage::from(read_existing(&options.diff, "Difference")?);

    log!(
        "Building {} from {} and {}...",
        out.display(),
        options.master.display(),
        options.diff.display()
    );
    let artifact = status!(smartcod_patcher::build(&master, &diff))?;

    write_atomically(out, &artifact.to_bytes())?;
    println!(
        "{} bytes of code, {} bytes of relocation bitmap",
        artifact.image().len(),
        artifact.bitmap().len()
    );

    Ok(())
}

pub fn load(options: &Options) -> Result<()> {
    let path = require(options.cod.as_deref(), "cod", "Input file")?;
    if !path.exists() {
        return Err(Error::FileNotFound {
            what: "Code",
            path: path.to_owned(),
        });
    }

    let mut sbx = open_session(options)?;

    println!("{}", sbx.get_credits()?.replace('\r', "\n").trim());

    let window = sbx.memory_window()?;
    let data = fs::read(path)?;
    if data.len() > window.available() {
        return Err(Error::TooLarge {
            path: path.to_owned(),
            available: window.available(),
        });
    }
    let entry = entry_offset(&data).ok_or_else(|| Error::Truncated(path.to_owned()))?;

    let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
    let lomem = window.lomem;
    sbx.download(lomem, &data, |offset, total| {
        let done = if total == 0 {
            1.0
        } else {
            offset as f32 / total as f32
        };
        print!(
            "\rDownloading {name} into SmartBox at &{lomem:04X} ({:.0}%)...",
            done * 100.0
        );
        // Progress is advisory; a failed flush only delays the line.
        stdout().flush().ok();
    })?;
    println!(" {}", "ok".green());

    let entrypoint = lomem.wrapping_add(entry);
    log!("Executing &{entrypoint:04X}...");
    status!(sbx.execute(entrypoint))?;

    Ok(sbx.close()?)
}

pub fn list(options: &Options) -> Result<()> {
    let mut sbx = open_session(options)?;

    log!("Reading job table...");
    let jobs = status!(sbx.jobs())?;
    for (code, name) in jobs {
        println!("&{code:02X} {name}");
    }

    Ok(sbx.close()?)
}

pub fn reset(options: &Options) -> Result<()> {
    let mut sbx = open_session(options)?;

    log!("Resetting SmartBox ({})...", options.reset);
    status!(sbx.reset(options.reset))?;

    Ok(sbx.close()?)
}

/// Call `job`, taking its inputs from the front of `args`
pub fn call(
    options: &Options,
    cache: &mut SignatureCache,
    job: &str,
    args: &mut VecDeque<String>,
) -> Result<()> {
    let mut sbx = open_session(options)?;

    log!("Calling {job}...");
    let outputs =
        status!(CallContext::new(&mut sbx, cache).call(job, options.params.as_deref(), args))?;
    for (i, value) in outputs.iter().enumerate() {
        println!("  {}: {value}", i + 1);
    }

    Ok(sbx.close()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionTable;

    fn options(dir: &Path, cod: &str) -> Options {
        let mut table = OptionTable::default();
        table.set("master", dir.join("code1").display().to_string());
        table.set("diff", dir.join("code2").display().to_string());
        table.set("cod", dir.join(cod).display().to_string());
        table.options().unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!("BUILD".parse::<Command>().unwrap(), Command::Build);
        assert_eq!("call".parse::<Command>().unwrap(), Command::Call);
        assert!("flash".parse::<Command>().is_err());
    }

    #[test]
    fn builds_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("code1"), [0x05, 0x00, 0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
        fs::write(dir.path().join("code2"), [0x05, 0x00, 0xAA, 0xFF, 0xCC, 0xDD]).unwrap();

        build(&options(dir.path(), "out.cod")).unwrap();

        assert_eq!(
            fs::read(dir.path().join("out.cod")).unwrap(),
            [0x05, 0x00, 0xAA, 0xBB, 0xCC, 0xDD, 0x08]
        );
    }

    #[test]
    fn failed_build_leaves_old_artifact_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("code1"), [0x02, 0x00, 0x00, 0x00]).unwrap();
        fs::write(dir.path().join("code2"), [0x02, 0x00, 0x00]).unwrap();
        fs::write(dir.path().join("out.cod"), b"previous").unwrap();

        let err = build(&options(dir.path(), "out.cod")).unwrap_err();

        assert!(matches!(
            err,
            Error::Patcher(smartcod_patcher::err::Error::SizeMismatch { .. })
        ));
        assert_eq!(fs::read(dir.path().join("out.cod")).unwrap(), b"previous");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn build_reports_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();

        let err = build(&options(dir.path(), "out.cod")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { what: "Master", .. }));
        assert!(!dir.path().join("out.cod").exists());
    }

    #[test]
    fn build_needs_output() {
        let err = build(&OptionTable::default().options().unwrap()).unwrap_err();
        assert!(matches!(err, Error::MissingOption { option: "cod", .. }));
    }

    #[test]
    fn load_needs_existing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = load(&options(dir.path(), "missing.cod")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { what: "Code", .. }));
    }

    #[test]
    fn session_commands_need_port() {
        let options = OptionTable::default().options().unwrap();

        for result in [list(&options), reset(&options)] {
            assert!(matches!(
                result,
                Err(Error::MissingOption { option: "port", .. })
            ));
        }
    }
}
