use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        // Host builds run the simulation backend only
        return;
    }

    // Configure for ATmega4809 (Arduino Nano Every)
    println!("cargo:rustc-link-arg=-mmcu=atmega4809");

    // Debug builds get the serial startup log
    if env::var("PROFILE").map(|p| p == "debug").unwrap_or(false) {
        println!("cargo:rustc-cfg=feature=\"debug\"");
    }

    println!("cargo:warning=Building for ATmega4809 at 20MHz");
}
