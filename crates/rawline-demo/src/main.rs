#![forbid(unsafe_code)]

//! Minimal driver: a read/echo loop over one editor session.
//!
//! Set `RAWLINE_LOG` (an env-filter directive, e.g. `rawline=debug`) to get
//! engine tracing on stderr.

use std::io;

fn main() -> io::Result<()> {
    init_tracing();

    let mut editor = rawline::Editor::new()?;
    tracing::debug!("editor session ready");
    loop {
        let line = editor.read_line(">> ")?;
        println!("{line}");
        if line == "exit" {
            break;
        }
    }
    Ok(())
}

fn init_tracing() {
    if std::env::var_os("RAWLINE_LOG").is_some() {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_env("RAWLINE_LOG"))
            .with_writer(io::stderr)
            .init();
    }
}
