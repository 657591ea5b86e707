pub mod click_event;
pub mod subscription;
pub mod user;

pub use click_event::Entity as ClickEventEntity;
pub use subscription::Entity as SubscriptionEntity;
pub use user::Entity as UserEntity;
