//! trybuild 编译期测试

#[test]
fn ui_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/component_ok.rs");
    t.pass("tests/trybuild/component_inherit_ok.rs");
    t.compile_fail("tests/trybuild/fail_unsupported_parameter_type.rs");
    t.compile_fail("tests/trybuild/fail_resource_not_shared.rs");
    t.compile_fail("tests/trybuild/fail_unknown_parameter_key.rs");
}
