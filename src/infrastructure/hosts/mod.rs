mod fs_hosts_file;

pub use fs_hosts_file::{FsHostsFile, DEFAULT_HOSTS_PATH};
