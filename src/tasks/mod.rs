//! CLI task layer: one module per subcommand, each a struct built from the
//! loaded toolchain profile with a blocking `execute`.

pub mod clean;
pub mod summary;
