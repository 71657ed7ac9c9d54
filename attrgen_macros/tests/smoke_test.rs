use attrgen_macros::generator_binding;

#[generator_binding("Outer.Inner, my_gens")]
#[derive(Debug, Default, PartialEq)]
pub struct ByName {
    pub value: u32,
}

#[generator_binding(my_gens::Builder, "ignored")]
#[derive(Debug)]
pub enum ByPath {
    One,
}

#[generator_binding("Duplicator")]
pub struct WithoutModule;

mod nested {
    #[attrgen_macros::generator_binding(super::ByName)]
    pub union Bits {
        pub raw: u32,
        pub float: f32,
    }
}

#[test]
fn test_items_pass_through_unchanged() {
    assert_eq!(ByName::default(), ByName { value: 0 });
    assert!(matches!(ByPath::One, ByPath::One));
    let _ = WithoutModule;
    let bits = nested::Bits { raw: 1 };
    assert_eq!(unsafe { bits.raw }, 1);
}
