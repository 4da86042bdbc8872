fn main() {
    modelgen_build::build!();
}
