pub mod attendance;
pub mod kind;
pub mod row;
pub mod student;
pub mod tag;
pub mod tag_event;
