//! Macro for the fieldless step type tag.

/// Generate a fieldless tag enum whose variants serialize to fixed strings.
///
/// Generates `ALL`, `as_str`, `from_tag` and `Display` alongside the enum.
///
/// ```ignore
/// step_types! {
///     pub enum Shape {
///         Circle => "circle",
///         RoundedBox => "roundedBox",
///     }
/// }
/// ```
macro_rules! step_types {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $tag:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $tag)]
                $variant
            ),*
        }

        impl $name {
            /// Every tag, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            /// The wire tag.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),*
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
