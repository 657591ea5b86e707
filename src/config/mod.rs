mod structs;

pub use structs::*;

use std::sync::OnceLock;

/// 全局静态配置实例
static CONFIG: OnceLock<StaticConfig> = OnceLock::new();

/// 初始化全局配置（幂等，重复调用无效果）
///
/// 应在程序启动时调用一次；测试中通过 `Once` 保证只初始化一次。
pub fn init_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::load)
}

/// 获取全局配置
///
/// 未显式初始化时按默认流程加载（TOML + 环境变量）。
pub fn get_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::load)
}
