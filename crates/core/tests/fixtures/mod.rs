//! Hand-assembled class files for tests.
//!
//! Shared with the CLI tests via `#[path]`, so keep it free of dependencies
//! beyond std.

#![allow(dead_code)]

use std::collections::HashMap;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;

/// Builds a constant pool, handing out indices as entries are added.
pub struct PoolBuilder {
    bytes: Vec<u8>,
    next: u16,
    utf8: HashMap<String, u16>,
}

impl PoolBuilder {
    fn new() -> Self {
        Self { bytes: Vec::new(), next: 1, utf8: HashMap::new() }
    }

    /// Append a raw entry (tag included) occupying `slots` indices.
    pub fn raw(&mut self, entry: &[u8], slots: u16) -> u16 {
        let index = self.next;
        self.bytes.extend_from_slice(entry);
        self.next += slots;
        index
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        if let Some(&index) = self.utf8.get(text) {
            return index;
        }
        let mut entry = vec![1];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        let index = self.raw(&entry, 1);
        self.utf8.insert(text.to_string(), index);
        index
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.raw(&tagged(7, &[name_index]), 1)
    }

    pub fn string(&mut self, text: &str) -> u16 {
        let string_index = self.utf8(text);
        self.raw(&tagged(8, &[string_index]), 1)
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        let mut entry = vec![3];
        entry.extend_from_slice(&value.to_be_bytes());
        self.raw(&entry, 1)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        let mut entry = vec![5];
        entry.extend_from_slice(&value.to_be_bytes());
        self.raw(&entry, 2)
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.raw(&tagged(12, &[name_index, descriptor_index]), 1)
    }

    pub fn field_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(owner);
        let nat = self.name_and_type(name, descriptor);
        self.raw(&tagged(9, &[class_index, nat]), 1)
    }

    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(owner);
        let nat = self.name_and_type(name, descriptor);
        self.raw(&tagged(10, &[class_index, nat]), 1)
    }
}

fn tagged(tag: u8, indices: &[u16]) -> Vec<u8> {
    let mut entry = vec![tag];
    for index in indices {
        entry.extend_from_slice(&index.to_be_bytes());
    }
    entry
}

fn attribute(name_index: u16, body: &[u8]) -> Vec<u8> {
    let mut out = name_index.to_be_bytes().to_vec();
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// Method body for [`ClassBuilder::method`].
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub bytes: Vec<u8>,
    /// (start_pc, line_number)
    pub line_numbers: Vec<(u16, u16)>,
    /// (start_pc, end_pc, handler_pc, catch_type)
    pub handlers: Vec<(u16, u16, u16, u16)>,
}

impl Code {
    pub fn new(max_stack: u16, max_locals: u16, bytes: Vec<u8>) -> Self {
        Self { max_stack, max_locals, bytes, line_numbers: Vec::new(), handlers: Vec::new() }
    }

    pub fn lines(mut self, lines: &[(u16, u16)]) -> Self {
        self.line_numbers = lines.to_vec();
        self
    }
}

pub struct ClassBuilder {
    pub pool: PoolBuilder,
    major: u16,
    access: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    attributes: Vec<Vec<u8>>,
}

impl ClassBuilder {
    /// A `public class <name> extends java/lang/Object`, version 52 (Java 8).
    pub fn new(name: &str) -> Self {
        let mut pool = PoolBuilder::new();
        let this_class = pool.class(name);
        let super_class = pool.class("java/lang/Object");
        Self {
            pool,
            major: 52,
            access: ACC_PUBLIC | ACC_SUPER,
            this_class,
            super_class,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn major_version(&mut self, major: u16) -> &mut Self {
        self.major = major;
        self
    }

    pub fn interface(&mut self, name: &str) -> &mut Self {
        let index = self.pool.class(name);
        self.interfaces.push(index);
        self
    }

    pub fn source_file(&mut self, file: &str) -> &mut Self {
        let name = self.pool.utf8("SourceFile");
        let value = self.pool.utf8(file);
        self.attributes.push(attribute(name, &value.to_be_bytes()));
        self
    }

    /// Class-level attribute the parser does not decode.
    pub fn custom_attribute(&mut self, name: &str, body: &[u8]) -> &mut Self {
        let name = self.pool.utf8(name);
        self.attributes.push(attribute(name, body));
        self
    }

    pub fn field(
        &mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        constant_value: Option<u16>,
    ) -> &mut Self {
        let mut attributes = Vec::new();
        if let Some(value) = constant_value {
            let attr_name = self.pool.utf8("ConstantValue");
            attributes.push(attribute(attr_name, &value.to_be_bytes()));
        }
        let member = self.member(access, name, descriptor, attributes);
        self.fields.push(member);
        self
    }

    pub fn method(
        &mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        code: Option<Code>,
    ) -> &mut Self {
        let mut attributes = Vec::new();
        if let Some(code) = code {
            attributes.push(self.code_attribute(&code));
        }
        let member = self.member(access, name, descriptor, attributes);
        self.methods.push(member);
        self
    }

    fn code_attribute(&mut self, code: &Code) -> Vec<u8> {
        let code_name = self.pool.utf8("Code");
        let mut body = Vec::new();
        body.extend_from_slice(&code.max_stack.to_be_bytes());
        body.extend_from_slice(&code.max_locals.to_be_bytes());
        body.extend_from_slice(&(code.bytes.len() as u32).to_be_bytes());
        body.extend_from_slice(&code.bytes);
        body.extend_from_slice(&(code.handlers.len() as u16).to_be_bytes());
        for (start, end, handler, catch_type) in &code.handlers {
            for value in [start, end, handler, catch_type] {
                body.extend_from_slice(&value.to_be_bytes());
            }
        }
        if code.line_numbers.is_empty() {
            body.extend_from_slice(&0u16.to_be_bytes());
        } else {
            let table_name = self.pool.utf8("LineNumberTable");
            let mut table = (code.line_numbers.len() as u16).to_be_bytes().to_vec();
            for (pc, line) in &code.line_numbers {
                table.extend_from_slice(&pc.to_be_bytes());
                table.extend_from_slice(&line.to_be_bytes());
            }
            body.extend_from_slice(&1u16.to_be_bytes());
            body.extend_from_slice(&attribute(table_name, &table));
        }
        attribute(code_name, &body)
    }

    fn member(
        &mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        attributes: Vec<Vec<u8>>,
    ) -> Vec<u8> {
        let name_index = self.pool.utf8(name);
        let descriptor_index = self.pool.utf8(descriptor);
        let mut out = Vec::new();
        out.extend_from_slice(&access.to_be_bytes());
        out.extend_from_slice(&name_index.to_be_bytes());
        out.extend_from_slice(&descriptor_index.to_be_bytes());
        out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
        for attr in attributes {
            out.extend_from_slice(&attr);
        }
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&self.major.to_be_bytes());
        out.extend_from_slice(&self.pool.next.to_be_bytes());
        out.extend_from_slice(&self.pool.bytes);
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for index in &self.interfaces {
            out.extend_from_slice(&index.to_be_bytes());
        }
        for members in [&self.fields, &self.methods, &self.attributes] {
            out.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for member in members {
                out.extend_from_slice(member);
            }
        }
        out
    }
}

fn u16_bytes(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// A class with no fields or methods.
pub fn empty_class(name: &str) -> Vec<u8> {
    ClassBuilder::new(name).build()
}

/// A small but realistic class:
///
/// ```java
/// public class <name> {
///     private static final long SEED = 42L;
///     public <name>() { super(); }
///     public static void main(String[] args) { System.out.println("Hello, world"); }
///     static int abs(int x) { return x < 0 ? -x : x; }
///     static int pick(int x) { switch (x) { case 0: return 1; case 1: return 2; default: return 0; } }
/// }
/// ```
pub fn hello_world(name: &str) -> Vec<u8> {
    let mut class = ClassBuilder::new(name);
    class.source_file(&format!("{name}.java"));

    let seed = class.pool.long(42);
    class.field(ACC_PRIVATE | ACC_STATIC | ACC_FINAL, "SEED", "J", Some(seed));

    let object_init = class.pool.method_ref("java/lang/Object", "<init>", "()V");
    let [ih, il] = u16_bytes(object_init);
    class.method(
        ACC_PUBLIC,
        "<init>",
        "()V",
        Some(Code::new(1, 1, vec![0x2a, 0xb7, ih, il, 0xb1]).lines(&[(0, 1)])),
    );

    let out = class.pool.field_ref("java/lang/System", "out", "Ljava/io/PrintStream;");
    let greeting = class.pool.string("Hello, world");
    let println = class.pool.method_ref("java/io/PrintStream", "println", "(Ljava/lang/String;)V");
    assert!(greeting <= u8::MAX as u16, "ldc needs a one-byte index");
    let [oh, ol] = u16_bytes(out);
    let [ph, pl] = u16_bytes(println);
    class.method(
        ACC_PUBLIC | ACC_STATIC,
        "main",
        "([Ljava/lang/String;)V",
        Some(
            Code::new(2, 1, vec![0xb2, oh, ol, 0x12, greeting as u8, 0xb6, ph, pl, 0xb1])
                .lines(&[(0, 3), (8, 4)]),
        ),
    );

    // 0: iload_0, 1: ifge 7, 4: iload_0, 5: ineg, 6: ireturn, 7: iload_0, 8: ireturn
    class.method(
        ACC_STATIC,
        "abs",
        "(I)I",
        Some(Code::new(1, 1, vec![0x1a, 0x9c, 0x00, 0x06, 0x1a, 0x74, 0xac, 0x1a, 0xac])),
    );

    // tableswitch at 1, padded to 4; cases 0 -> 24, 1 -> 26, default -> 28.
    let mut pick = vec![0x1a, 0xaa, 0x00, 0x00];
    for value in [27i32, 0, 1, 23, 25] {
        pick.extend_from_slice(&value.to_be_bytes());
    }
    pick.extend_from_slice(&[0x04, 0xac, 0x05, 0xac, 0x03, 0xac]);
    class.method(ACC_STATIC, "pick", "(I)I", Some(Code::new(1, 1, pick)));

    class.build()
}
