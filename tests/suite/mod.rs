mod config_file;
mod failures;
mod input;
mod rounds;
