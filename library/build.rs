use rustc_version::{Channel, version_meta};

fn main() {
    println!("cargo::rustc-check-cfg=cfg(CHANNEL_NIGHTLY)");
    if let Ok(meta) = version_meta()
        && meta.channel == Channel::Nightly
    {
        println!("cargo:rustc-cfg=CHANNEL_NIGHTLY");
    }
}
