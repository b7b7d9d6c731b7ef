//! One module per subcommand, each a thin formatting layer over `hostpkg-core`.

/// `fix-symlinks` subcommand.
pub mod fix_symlinks;
/// `info` subcommand.
pub mod info;
/// `install` subcommand.
pub mod install;
/// `list` subcommand.
pub mod list;
/// `remove` subcommand.
pub mod remove;
/// `search` subcommand.
pub mod search;
/// `update` subcommand.
pub mod update;
/// `update-metadata` subcommand.
pub mod update_metadata;
