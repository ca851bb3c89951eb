/// Creates a single [`ParameterDefinition`](crate::ParameterDefinition) from a
/// type shorthand.
///
/// ```rust
/// use ftoolbox::{ParameterType, ftb_param};
///
/// let id = ftb_param!(integer "id" => "Row id");
/// assert_eq!(id.kind, ParameterType::Integer);
/// assert!(id.is_required());
///
/// let ids = ftb_param!(array "ids" of integer => "Row ids");
/// assert_eq!(ids.items.map(|items| items.kind), Some(ParameterType::Integer));
/// ```
#[macro_export]
macro_rules! ftb_param {
    (string $name:literal => $description:expr $(,)?) => {
        $crate::ParameterDefinition::string($name, $description)
    };
    (integer $name:literal => $description:expr $(,)?) => {
        $crate::ParameterDefinition::integer($name, $description)
    };
    (float $name:literal => $description:expr $(,)?) => {
        $crate::ParameterDefinition::float($name, $description)
    };
    (boolean $name:literal => $description:expr $(,)?) => {
        $crate::ParameterDefinition::boolean($name, $description)
    };
    (array $name:literal of $item:ident => $description:expr $(,)?) => {
        $crate::ParameterDefinition::array($name, $description, $crate::ftb_param!($item "item" => ""))
    };
    (array $name:literal => $description:expr $(,)?) => {
        compile_error!("array parameters need an item type: ftb_param!(array \"name\" of string => \"...\")");
    };
}

/// Creates a `Vec<ParameterDefinition>` from type/name/description triples.
///
/// ```rust
/// use ftoolbox::ftb_params;
///
/// let params = ftb_params![
///     integer "id" => "Row id",
///     string "name" => "Row name",
/// ];
///
/// assert_eq!(params.len(), 2);
/// assert_eq!(params[1].name, "name");
/// ```
#[macro_export]
macro_rules! ftb_params {
    () => {
        Vec::<$crate::ParameterDefinition>::new()
    };
    ($($kind:ident $name:literal => $description:expr),+ $(,)?) => {
        vec![$($crate::ftb_param!($kind $name => $description)),+]
    };
}
