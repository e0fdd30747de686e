/// Builds a [`SectionTree`](crate::SectionTree) from a literal listing.
///
/// Values are literals or other single-token expressions (converted with `ToString`), or
/// `null` for a key with no payload.
///
/// ```rust
/// use serde_ini_tree::sections;
///
/// let tree = sections! {
///     "Config" => { "Name" => "prod", "Threshold" => 0.75, "Note" => null },
///     "Config.Sub" => { "Enabled" => "True" },
/// };
///
/// assert_eq!(tree.value("Config", "Threshold"), Some("0.75"));
/// assert_eq!(tree.section("Config").unwrap().get("Note"), Some(None));
/// ```
#[macro_export]
macro_rules! sections {
    // Handle a null payload
    (@value null) => {
        ::std::option::Option::None
    };

    // Handle any other value
    (@value $value:expr) => {
        ::std::option::Option::Some(::std::string::ToString::to_string(&$value))
    };

    // Handle empty tree
    () => {
        $crate::SectionTree::new()
    };

    // Handle sections
    ($($section:literal => { $($key:literal => $value:tt),* $(,)? }),+ $(,)?) => {{
        let mut tree = $crate::SectionTree::new();
        $(
            tree.section_mut($section);
            $(
                tree.section_mut($section).insert($key, $crate::sections!(@value $value));
            )*
        )+
        tree
    }};
}
