use clap::CommandFactory;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=crates/airdash-cli/src/lib.rs");

    // Generate manpage using clap_mangen
    let cmd = airdash_cli::Args::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buffer: Vec<u8> = Default::default();
    man.render(&mut buffer)?;

    let out_dir = env::var("OUT_DIR")
        .map(PathBuf::from)
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;

    let dest_path = out_dir.join("airdash.1");
    fs::write(&dest_path, &buffer)?;

    // OUT_DIR is target/<profile>/build/airdash-<hash>/out; three levels up is target/<profile>/
    if env::var("PROFILE").unwrap_or_default() == "release" {
        if let Some(release_dir) = out_dir.ancestors().nth(3) {
            fs::write(release_dir.join("airdash.1"), &buffer)?;
        }
    }

    Ok(())
}
