//! 会话标识存储
//!
//! 对应浏览器端的 per-tab session storage：进程内易失，
//! 清空后下次取值会生成新的会话 id。
//! 会话 id 只是关联键，不做任何访问控制用途。

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::utils::generate_base36_code;

/// 会话 id 在存储中的键名
pub const SESSION_STORAGE_KEY: &str = "tracking-session-id";

/// 无会话存储环境下使用的固定哨兵值
pub const SESSION_FALLBACK_ID: &str = "server-side";

/// 随机后缀长度
const SESSION_SUFFIX_LENGTH: usize = 9;

/// 会话范围的键值存储
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn clear(&self);
}

/// 进程内会话存储
#[derive(Default)]
pub struct MemorySessionStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.data.lock().unwrap().insert(key.to_string(), value);
    }

    fn clear(&self) {
        self.data.lock().unwrap().clear();
    }
}

/// 取出或创建会话 id
///
/// 已存在时原样返回；否则生成
/// `session_<epoch-millis>_<9位base36随机后缀>` 并写入存储。
/// 唯一性只依赖时间戳加随机后缀，碰撞概率可以忽略。
pub fn get_or_create_session_id(store: &dyn SessionStore) -> String {
    if let Some(id) = store.get(SESSION_STORAGE_KEY) {
        return id;
    }

    let id = format!(
        "session_{}_{}",
        Utc::now().timestamp_millis(),
        generate_base36_code(SESSION_SUFFIX_LENGTH)
    );
    store.set(SESSION_STORAGE_KEY, id.clone());
    id
}
