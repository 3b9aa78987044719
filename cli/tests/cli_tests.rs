#[test]
fn classify() {
    trycmd::TestCases::new()
        .case("tests/classify/*.toml")
        .env("CALLABLE_ALLOW_STDIN", "true")
        .default_bin_name("callable");
}
