pub mod calibrate;
pub mod feedback;
pub mod init;
pub mod interview;
pub mod load;
pub mod slots;
