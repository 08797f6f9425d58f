//! XML navigation utilities.

mod utils;

pub use utils::{
    element_children, find_child, get_attribute, get_tag_name, get_text, has_tag,
    is_default_namespace, namespace_uri, text_pos,
};
