use ast::Expr;
use unique_ident::TempCounter;

use crate::tac::{Instruction, Operand, Program};

/// Lowers an AST to three-address code by post-order traversal.
///
/// Instructions and temporary numbering accumulate across calls to
/// `generate`. Call `reset` (or build a new generator) before lowering an
/// unrelated expression, otherwise its temporaries continue the old numbering.
#[derive(Debug, Default)]
pub struct CodeGenerator {
    temps: TempCounter,
    instructions: Vec<Instruction>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            temps: TempCounter::new(),
            instructions: vec![],
        }
    }

    /// Appends the instructions for `expr` and returns the operand holding its value
    pub fn generate(&mut self, expr: &Expr) -> Operand {
        match expr {
            Expr::Number(text) => Operand::Literal(text.clone()),
            Expr::Binary { op, left, right } => {
                let lhs = self.generate(left);
                let rhs = self.generate(right);
                let dest = self.temps.make_temp();

                self.instructions.push(Instruction {
                    dest: dest.clone(),
                    op: *op,
                    lhs,
                    rhs,
                });

                Operand::Temp(dest)
            }
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Clears emitted instructions and restarts temporaries at `temp1`
    pub fn reset(&mut self) {
        self.temps.reset();
        self.instructions.clear();
    }
}

/// Lowers `expr` with a fresh generator
pub fn gen_tac(expr: &Expr) -> Program {
    let mut generator = CodeGenerator::new();
    let result = generator.generate(expr);

    Program {
        instructions: generator.into_instructions(),
        result,
    }
}
