/// Print without a newline and flush, for a status that follows on the same line
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {{
        print!($($arg)*);
        std::io::Write::flush(&mut std::io::stdout())?;
    }};
}

#[macro_export]
macro_rules! status {
    ($code:expr) => {{
        let ret = $code;
        match &ret {
            Ok(_) => println!(" {}", "ok".green()),
            Err(_) => println!(" {}", "failed".red()),
        }
        ret
    }};
}
