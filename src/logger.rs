use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Default)]
pub(super) struct LoggerConfig {
    pub format: LoggerFormat,
}

#[derive(Default)]
pub(super) enum LoggerFormat {
    #[default]
    Json,
    Plain,
}

pub(super) fn init_logger(config: LoggerConfig) {
    let builder = SubscriberBuilder::default();

    match config.format {
        LoggerFormat::Json => builder.json().init(),
        LoggerFormat::Plain => builder.init(),
    }
}
