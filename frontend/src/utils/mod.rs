pub mod cookies;
pub mod dom;
pub mod storage;
pub mod time;
pub mod timer;
