pub mod admin_credential;
pub mod analytics_event;
pub mod question;
pub mod suggestion;

pub use admin_credential::Entity as AdminCredentialEntity;
pub use analytics_event::Entity as AnalyticsEventEntity;
pub use question::Entity as QuestionEntity;
pub use suggestion::Entity as SuggestionEntity;
