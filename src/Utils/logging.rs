use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Installs the terminal logger once; later calls keep the first logger
pub fn init_logging(level: LevelFilter) -> bool {
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).is_ok()
}

/// `error|warn|info|debug|trace|off`, case-insensitive
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("info"), Some(LevelFilter::Info));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }
}
