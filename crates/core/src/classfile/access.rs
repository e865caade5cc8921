//! Access flag tables for classes, fields, and methods.

/// Which structure an access flag word belongs to; the same bit means
/// different things in different places (0x0020 is ACC_SUPER on a class but
/// ACC_SYNCHRONIZED on a method).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagTarget {
    Class,
    Field,
    Method,
    InnerClass,
}

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
pub const ACC_VOLATILE: u16 = 0x0040;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_TRANSIENT: u16 = 0x0080;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_STRICT: u16 = 0x0800;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;
pub const ACC_MODULE: u16 = 0x8000;

/// (bit, flag name, source keyword if the flag has one)
type FlagEntry = (u16, &'static str, Option<&'static str>);

const CLASS_FLAGS: &[FlagEntry] = &[
    (ACC_PUBLIC, "ACC_PUBLIC", Some("public")),
    (ACC_FINAL, "ACC_FINAL", Some("final")),
    (ACC_SUPER, "ACC_SUPER", None),
    (ACC_INTERFACE, "ACC_INTERFACE", None),
    (ACC_ABSTRACT, "ACC_ABSTRACT", Some("abstract")),
    (ACC_SYNTHETIC, "ACC_SYNTHETIC", None),
    (ACC_ANNOTATION, "ACC_ANNOTATION", None),
    (ACC_ENUM, "ACC_ENUM", None),
    (ACC_MODULE, "ACC_MODULE", None),
];

const INNER_CLASS_FLAGS: &[FlagEntry] = &[
    (ACC_PUBLIC, "ACC_PUBLIC", Some("public")),
    (ACC_PRIVATE, "ACC_PRIVATE", Some("private")),
    (ACC_PROTECTED, "ACC_PROTECTED", Some("protected")),
    (ACC_STATIC, "ACC_STATIC", Some("static")),
    (ACC_FINAL, "ACC_FINAL", Some("final")),
    (ACC_INTERFACE, "ACC_INTERFACE", None),
    (ACC_ABSTRACT, "ACC_ABSTRACT", Some("abstract")),
    (ACC_SYNTHETIC, "ACC_SYNTHETIC", None),
    (ACC_ANNOTATION, "ACC_ANNOTATION", None),
    (ACC_ENUM, "ACC_ENUM", None),
];

const FIELD_FLAGS: &[FlagEntry] = &[
    (ACC_PUBLIC, "ACC_PUBLIC", Some("public")),
    (ACC_PRIVATE, "ACC_PRIVATE", Some("private")),
    (ACC_PROTECTED, "ACC_PROTECTED", Some("protected")),
    (ACC_STATIC, "ACC_STATIC", Some("static")),
    (ACC_FINAL, "ACC_FINAL", Some("final")),
    (ACC_VOLATILE, "ACC_VOLATILE", Some("volatile")),
    (ACC_TRANSIENT, "ACC_TRANSIENT", Some("transient")),
    (ACC_SYNTHETIC, "ACC_SYNTHETIC", None),
    (ACC_ENUM, "ACC_ENUM", None),
];

const METHOD_FLAGS: &[FlagEntry] = &[
    (ACC_PUBLIC, "ACC_PUBLIC", Some("public")),
    (ACC_PRIVATE, "ACC_PRIVATE", Some("private")),
    (ACC_PROTECTED, "ACC_PROTECTED", Some("protected")),
    (ACC_STATIC, "ACC_STATIC", Some("static")),
    (ACC_FINAL, "ACC_FINAL", Some("final")),
    (ACC_SYNCHRONIZED, "ACC_SYNCHRONIZED", Some("synchronized")),
    (ACC_BRIDGE, "ACC_BRIDGE", None),
    (ACC_VARARGS, "ACC_VARARGS", None),
    (ACC_NATIVE, "ACC_NATIVE", Some("native")),
    (ACC_ABSTRACT, "ACC_ABSTRACT", Some("abstract")),
    (ACC_STRICT, "ACC_STRICT", Some("strictfp")),
    (ACC_SYNTHETIC, "ACC_SYNTHETIC", None),
];

fn table(target: FlagTarget) -> &'static [FlagEntry] {
    match target {
        FlagTarget::Class => CLASS_FLAGS,
        FlagTarget::Field => FIELD_FLAGS,
        FlagTarget::Method => METHOD_FLAGS,
        FlagTarget::InnerClass => INNER_CLASS_FLAGS,
    }
}

/// Names of the flags set in `flags`, e.g. `["ACC_PUBLIC", "ACC_SUPER"]`.
pub fn flag_names(flags: u16, target: FlagTarget) -> Vec<&'static str> {
    table(target).iter().filter(|(bit, _, _)| flags & bit != 0).map(|(_, name, _)| *name).collect()
}

/// Source modifiers for `flags`, each followed by a space (`"public static "`).
///
/// Interfaces are implicitly abstract, so `abstract` is dropped for them.
pub fn modifiers(flags: u16, target: FlagTarget) -> String {
    let implicit_abstract =
        matches!(target, FlagTarget::Class | FlagTarget::InnerClass) && flags & ACC_INTERFACE != 0;
    let mut out = String::new();
    for (bit, _, keyword) in table(target) {
        if flags & bit == 0 {
            continue;
        }
        if *bit == ACC_ABSTRACT && implicit_abstract {
            continue;
        }
        if let Some(keyword) = keyword {
            out.push_str(keyword);
            out.push(' ');
        }
    }
    out
}

/// Keyword introducing a class declaration.
pub fn class_kind(flags: u16) -> &'static str {
    if flags & ACC_MODULE != 0 {
        "module"
    } else if flags & ACC_ANNOTATION != 0 {
        "@interface"
    } else if flags & ACC_INTERFACE != 0 {
        "interface"
    } else if flags & ACC_ENUM != 0 {
        "enum"
    } else {
        "class"
    }
}
