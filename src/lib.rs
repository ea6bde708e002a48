//! Two-player chess rules engine over a 64-tile board.
//!
//! [`chess::board::Board`] owns the game state and validates every move
//! through [`chess::movegen`], which produces candidates, filters them for
//! king safety and detects check, checkmate and stalemate. [`Session`] is a
//! line-oriented text front end for driving a game from a terminal or a
//! script.

pub mod chess;

mod session;
pub use session::Session;
use shadow_rs::shadow;

shadow!(build);

/// Build type and target. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version and a short description on startup.
pub fn print_engine_info() {
    println!("tilechess {}", engine_version());
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Prints information the build type, features and whether the build is clean
/// on startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Features: {FEATURES}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
