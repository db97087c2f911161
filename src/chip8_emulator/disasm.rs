fn x_field(opcode: u16) -> u16 {
    (opcode >> 8) & 0x0F
}

fn y_field(opcode: u16) -> u16 {
    (opcode >> 4) & 0x0F
}

/// Renders an instruction word as an assembler mnemonic, `???` when unassigned.
pub fn disassemble(opcode: u16) -> String {
    let x = x_field(opcode);
    let y = y_field(opcode);
    let kk = opcode & 0x00FF;
    let nnn = opcode & 0x0FFF;
    let n = opcode & 0x000F;

    match opcode & 0xF000 {
        0x0000 => match opcode {
            0x00E0 => "CLS".to_owned(),
            0x00EE => "RET".to_owned(),
            _ => format!("SYS {nnn:03X}"),
        },
        0x1000 => format!("JP {nnn:03X}"),
        0x2000 => format!("CALL {nnn:03X}"),
        0x3000 => format!("SE V{x:X},{kk:02X}"),
        0x4000 => format!("SNE V{x:X},{kk:02X}"),
        0x5000 => format!("SE V{x:X},V{y:X}"),
        0x6000 => format!("LD V{x:X},{kk:02X}"),
        0x7000 => format!("ADD V{x:X},{kk:02X}"),
        0x8000 => {
            let name = match n {
                0x0 => "LD",
                0x1 => "OR",
                0x2 => "AND",
                0x3 => "XOR",
                0x4 => "ADD",
                0x5 => "SUB",
                0x6 => "SHR",
                0x7 => "SUBN",
                0xE => "SHL",
                _ => return "???".to_owned(),
            };
            format!("{name} V{x:X},V{y:X}")
        }
        0x9000 => format!("SNE V{x:X},V{y:X}"),
        0xA000 => format!("LD I,{nnn:03X}"),
        0xB000 => format!("JP V0,{nnn:03X}"),
        0xC000 => format!("RND V{x:X},{kk:02X}"),
        0xD000 => format!("DRW V{x:X},V{y:X},{n:X}"),
        0xE000 => match kk {
            0x9E => format!("SKP V{x:X}"),
            0xA1 => format!("SKNP V{x:X}"),
            _ => "???".to_owned(),
        },
        _ => match kk {
            0x07 => format!("LD V{x:X},DT"),
            0x0A => format!("LD V{x:X},K"),
            0x15 => format!("LD DT,V{x:X}"),
            0x18 => format!("LD ST,V{x:X}"),
            0x1E => format!("ADD I,V{x:X}"),
            0x29 => format!("LD F,V{x:X}"),
            0x33 => format!("LD B,V{x:X}"),
            0x55 => format!("LD [I],V{x:X}"),
            0x65 => format!("LD V{x:X},[I]"),
            _ => "???".to_owned(),
        },
    }
}
