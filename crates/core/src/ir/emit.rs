//! Type rendering via the Emit trait.
//!
//! Each IR type implements `Emit` to produce the text used in generated
//! signatures and in return/parameter descriptions.

use super::types::{IrType, Known, Primitive, Wrapper};

/// Trait for rendering IR nodes as source text.
pub trait Emit {
    /// Convert the node to its source text.
    fn emit(&self) -> String;
}

impl Emit for Primitive {
    fn emit(&self) -> String {
        match self {
            Primitive::Void => "void".to_string(),
            Primitive::Boolean => "boolean".to_string(),
            Primitive::Int => "int".to_string(),
            Primitive::Long | Primitive::UnixTimeLong => "long".to_string(),
            Primitive::Double => "double".to_string(),
        }
    }
}

impl Emit for Known {
    fn emit(&self) -> String {
        self.name().to_string()
    }
}

impl Emit for Wrapper {
    fn emit(&self) -> String {
        self.name().to_string()
    }
}

impl Emit for IrType {
    fn emit(&self) -> String {
        match self {
            IrType::Primitive(p) => p.emit(),
            IrType::Known(k) => k.emit(),
            IrType::Class(class) | IrType::Enum(class) => class.name.clone(),
            IrType::ByteArray => "byte[]".to_string(),
            IrType::List(element) => format!("List<{}>", element.emit()),
            IrType::Map(value) => format!("Map<String, {}>", value.emit()),
            IrType::Generic { base, args } => {
                let args = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{}<{args}>", base.emit())
            }
            IrType::PageImpl { class, element } => format!("{}<{}>", class.name, element.emit()),
        }
    }
}
