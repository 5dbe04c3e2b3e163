use std::fs::OpenOptions;

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use super::{config::Settings, err::CustomError};

/// Installs the terminal logger and, when configured, a file logger.
pub fn init_logger(settings: &Settings) -> Result<(), CustomError> {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("siarsip")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        settings.log_level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = &settings.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        loggers.push(WriteLogger::new(settings.log_level, config, file));
    }

    CombinedLogger::init(loggers)?;
    log::info!("logger ready at level {}", settings.log_level);
    Ok(())
}
