use std::fmt::{Display, Formatter};

pub use ast::BinaryOp;

/// Linear three-address code for one expression, in evaluation order
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    /// Operand holding the value of the whole expression
    pub result: Operand,
}

/// `dest = lhs op rhs`
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Instruction {
    pub dest: String,
    pub op: BinaryOp,
    pub lhs: Operand,
    pub rhs: Operand,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Operand {
    Literal(String),
    Temp(String),
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Literal(text) => write!(f, "{}", text),
            Operand::Temp(name) => write!(f, "{}", name),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {} {} {}", self.dest, self.lhs, self.op, self.rhs)
    }
}

impl Program {
    /// Instructions rendered as `"<dest> = <lhs> <op> <rhs>"`
    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().map(|i| i.to_string()).collect()
    }
}
