fn main() {
    // The ESP-IDF build only applies when cross-compiling for an Espressif
    // target (xtensa for ESP32/S3, riscv32 for ESP32-H2/C6). Host builds and
    // tests skip it.
    if let Ok(target) = std::env::var("TARGET") {
        if target.ends_with("-espidf") {
            embuild::espidf::sysenv::output();
        }
    }

    // Build-time overrides are captured with option_env!, so a change must
    // trigger a rebuild.
    for key in [
        "ZB_CHANNEL_MASK",
        "ZB_CHANNELS",
        "ZB_ROLE",
        "ZB_MAX_CHILDREN",
        "ZB_INSTALL_CODE_POLICY",
        "ZB_ED_TIMEOUT",
        "ZB_KEEP_ALIVE_MS",
        "ZB_MANUFACTURER_NAME",
        "ZB_MODEL_IDENTIFIER",
        "ZB_ENDPOINT",
        "ZB_RADIO_MODE",
        "ZB_HOST_MODE",
        "IDF_TARGET",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }
}
