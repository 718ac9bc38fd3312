use std::fs::File;
use std::io::{BufWriter, Write};

use crate::tac::*;

type IOResult = std::io::Result<()>;

/// Writes the listing of `program` to `file_name`
pub fn debug_tac(program: &Program, file_name: &str) -> IOResult {
    let output = File::create(file_name)?;
    let mut writer = BufWriter::new(output);

    write_program(&mut writer, program)?;

    writer.flush()?;

    Ok(())
}

/// One instruction per line, followed by the operand holding the result
pub fn write_program<W: Write>(writer: &mut W, program: &Program) -> IOResult {
    for instruction in &program.instructions {
        writeln!(writer, "{}", instruction)?;
    }

    writeln!(writer, "result = {}", program.result)
}
