// crates/mh_sealevel/tests/init_log.rs

//! 初始化日志测试
//!
//! 单独成一个测试二进制，进程内只安装一次记录器。

use log::{Level, LevelFilter, Log, Metadata, Record};
use mh_config::{SeaLevelConfig, SlrType};
use mh_sealevel::SeaLevelPolicy;
use std::sync::Mutex;

struct CaptureLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    lines: Mutex::new(Vec::new()),
};

#[test]
fn test_initialize_logs_configured_rate() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let policy = SeaLevelPolicy::from_config(SeaLevelConfig::new(10.0, SlrType::Gradual)).unwrap();

    let lines = LOGGER.lines.lock().unwrap();
    let configured: Vec<_> = lines
        .iter()
        .filter(|(_, msg)| msg.starts_with("Re-configured final SLR based on mm/yr and style: "))
        .collect();
    assert_eq!(configured.len(), 1);

    let (level, msg) = configured[0];
    assert_eq!(*level, Level::Info);
    assert_eq!(
        msg,
        &format!(
            "Re-configured final SLR based on mm/yr and style: {}",
            policy.initial_rate()
        )
    );
}
