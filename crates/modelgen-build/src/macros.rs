/// Build-script entry point: generate models for the calling crate.
///
/// Reads `CARGO_MANIFEST_DIR`, `OUT_DIR` and an optional `modelgen.toml`,
/// writes artifacts to `$OUT_DIR/modelgen` and fails the build on any
/// generation error.
#[macro_export]
macro_rules! build {
    () => {{
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");

        //
        // MODELS
        //

        let result = $crate::Generator::from_env()
            .and_then(|generator| generator.run(&mut $crate::__private::TracingDiagnostics));

        if let Err(err) = result {
            panic!("modelgen: {err}");
        }
    }};
}
