mod signup_record;
mod topic_id;

pub use signup_record::SignupRecord;
pub use topic_id::TopicId;
