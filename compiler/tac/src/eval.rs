use std::collections::HashMap;

use thiserror::Error;

use crate::tac::*;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    #[error("literal '{0}' does not fit in a 64-bit integer")]
    InvalidLiteral(String),
    #[error("temporary '{0}' is used before it is assigned")]
    UndefinedTemp(String),
    #[error("division by zero while computing {dest}")]
    DivisionByZero { dest: String },
    #[error("arithmetic overflow while computing {dest}")]
    Overflow { dest: String },
}

/// Runs the instructions in order, substituting each temporary's value,
/// and returns the value of the program's result operand.
pub fn eval(program: &Program) -> Result<i64, EvalError> {
    let mut temps: HashMap<&str, i64> = HashMap::new();

    for instruction in &program.instructions {
        let lhs = resolve(&temps, &instruction.lhs)?;
        let rhs = resolve(&temps, &instruction.rhs)?;
        let value = apply(instruction, lhs, rhs)?;

        temps.insert(instruction.dest.as_str(), value);
    }

    resolve(&temps, &program.result)
}

fn resolve(temps: &HashMap<&str, i64>, operand: &Operand) -> Result<i64, EvalError> {
    match operand {
        Operand::Literal(text) => text
            .parse::<i64>()
            .map_err(|_| EvalError::InvalidLiteral(text.clone())),
        Operand::Temp(name) => temps
            .get(name.as_str())
            .copied()
            .ok_or_else(|| EvalError::UndefinedTemp(name.clone())),
    }
}

fn apply(instruction: &Instruction, lhs: i64, rhs: i64) -> Result<i64, EvalError> {
    let overflow = || EvalError::Overflow {
        dest: instruction.dest.clone(),
    };

    match instruction.op {
        BinaryOp::Add => lhs.checked_add(rhs).ok_or_else(overflow),
        BinaryOp::Subtract => lhs.checked_sub(rhs).ok_or_else(overflow),
        BinaryOp::Multiply => lhs.checked_mul(rhs).ok_or_else(overflow),
        BinaryOp::Divide => {
            if rhs == 0 {
                return Err(EvalError::DivisionByZero {
                    dest: instruction.dest.clone(),
                });
            }
            lhs.checked_div(rhs).ok_or_else(overflow)
        }
    }
}

#[cfg(test)]
mod tests {
    use ast::Expr;

    use super::*;
    use crate::gen_tac;

    fn num(text: &str) -> Expr {
        Expr::number(text)
    }

    #[test]
    fn demo_expression_composes_to_141() {
        // 4+7*14+(7+6)*3
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::binary(
                BinaryOp::Add,
                num("4"),
                Expr::binary(BinaryOp::Multiply, num("7"), num("14")),
            ),
            Expr::binary(
                BinaryOp::Multiply,
                Expr::binary(BinaryOp::Add, num("7"), num("6")),
                num("3"),
            ),
        );

        assert_eq!(eval(&gen_tac(&expr)), Ok(141))
    }

    #[test]
    fn literal_result() {
        assert_eq!(eval(&gen_tac(&num("17"))), Ok(17))
    }

    #[test]
    fn division_truncates() {
        let expr = Expr::binary(BinaryOp::Divide, num("7"), num("2"));

        assert_eq!(eval(&gen_tac(&expr)), Ok(3))
    }

    #[test]
    fn division_by_zero() {
        let expr = Expr::binary(
            BinaryOp::Divide,
            num("1"),
            Expr::binary(BinaryOp::Subtract, num("2"), num("2")),
        );

        assert_eq!(
            eval(&gen_tac(&expr)),
            Err(EvalError::DivisionByZero {
                dest: "temp2".to_string()
            })
        )
    }

    #[test]
    fn overflow_is_reported() {
        let expr = Expr::binary(BinaryOp::Multiply, num("9223372036854775807"), num("2"));

        assert_eq!(
            eval(&gen_tac(&expr)),
            Err(EvalError::Overflow {
                dest: "temp1".to_string()
            })
        )
    }

    #[test]
    fn oversized_literal() {
        let text = "99999999999999999999";

        assert_eq!(
            eval(&gen_tac(&num(text))),
            Err(EvalError::InvalidLiteral(text.to_string()))
        )
    }

    #[test]
    fn undefined_temp() {
        let program = Program {
            instructions: vec![],
            result: Operand::Temp("temp9".to_string()),
        };

        assert_eq!(
            eval(&program),
            Err(EvalError::UndefinedTemp("temp9".to_string()))
        )
    }
}
