pub mod auth_service;
pub mod retention;
pub mod subscription_service;
pub mod tracking_service;

pub use auth_service::{AuthService, RegisterRequest, UserInfo};
pub use retention::DataRetentionTask;
pub use subscription_service::{SubscribeOutcome, SubscriptionService};
pub use tracking_service::{
    ClickCountGroup, HourlyStatGroup, Period, RecentClick, TrackClickRequest, TrackingService,
    TrackingStats,
};
