mod command_to_string;
mod detect_software;

pub use detect_software::check_blastn;
pub use detect_software::check_curl;
pub use detect_software::check_makeblastdb;
pub use detect_software::check_software;

pub use command_to_string::command_to_string;
pub use command_to_string::run_utility;
