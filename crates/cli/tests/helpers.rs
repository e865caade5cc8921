use std::path::Path;

use classtrace::{class_name_for, class_name_for_file, is_class_file};

#[test]
fn class_name_for_joins_components_with_slashes() {
    let relative = Path::new("com").join("example").join("Main.class");
    assert_eq!(class_name_for(&relative).unwrap(), "com/example/Main");
}

#[test]
fn class_name_for_keeps_nested_class_markers() {
    assert_eq!(class_name_for(Path::new("Outer$Inner.class")).unwrap(), "Outer$Inner");
}

/// `..` components and empty paths cannot produce a class name.
#[test]
fn class_name_for_rejects_parent_components() {
    assert!(class_name_for(Path::new("../Main.class")).is_err());
    assert!(class_name_for(Path::new("")).is_err());
}

#[test]
fn class_name_for_file_uses_stem() {
    assert_eq!(class_name_for_file(Path::new("/tmp/build/Main.class")).unwrap(), "Main");
}

#[test]
fn is_class_file_checks_extension() {
    assert!(is_class_file(Path::new("a/B.class")));
    assert!(!is_class_file(Path::new("a/B.java")));
    assert!(!is_class_file(Path::new("a/class")));
}
