//! Human readable dumps of every voice and operator field.

use std::fmt;

use crate::bank::Bank;
use crate::patch::{Operator, Voice};

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.envelope;
        let ks = &self.keyboard_scaling;
        writeln!(
            f,
            "    EGRate:  {:02} {:02} {:02} {:02}    EGLevel: {:02} {:02} {:02} {:02}",
            e.rate[0], e.rate[1], e.rate[2], e.rate[3], e.level[0], e.level[1], e.level[2], e.level[3]
        )?;
        writeln!(
            f,
            "    BreakPoint: {:02}  LeftDepth: {:02}  RightDepth: {:02}  LeftCurve: {}  RightCurve: {}",
            ks.break_point, ks.left_depth, ks.right_depth, ks.left_curve, ks.right_curve
        )?;
        writeln!(
            f,
            "    RateScale: {}  AmpModSens: {}  KeyVelSens: {}  OutputLevel: {:02}",
            self.rate_scaling, self.amp_mod_sensitivity, self.velocity_sensitivity, self.level
        )?;
        write!(
            f,
            "    OscMode: {}  FreqCoarse: {:02}  FreqFine: {:02}  Detune: {:02}",
            self.mode, self.coarse, self.fine, self.detune
        )
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}", String::from_utf8_lossy(&self.name))?;
        if let Some(source) = &self.source {
            write!(f, "    File: {}", source)?;
        }
        writeln!(f)?;

        for (n, op) in self.op.iter().enumerate() {
            writeln!(f, "  Operator {}", n + 1)?;
            writeln!(f, "{}", op)?;
        }

        let p = &self.pitch_envelope;
        writeln!(
            f,
            "  PitchEGRate: {:02} {:02} {:02} {:02}    PitchEGLevel: {:02} {:02} {:02} {:02}",
            p.rate[0], p.rate[1], p.rate[2], p.rate[3], p.level[0], p.level[1], p.level[2], p.level[3]
        )?;
        writeln!(
            f,
            "  Algorithm: {:02}  Feedback: {}  OscKeySync: {}  Transpose: {:02}",
            self.algorithm, self.feedback, self.osc_key_sync, self.transpose
        )?;
        write!(
            f,
            "  LfoSpeed: {:02}  LfoDelay: {:02}  LfoPitchModDepth: {:02}  LfoAMDepth: {:02}  \
             LfoSync: {}  LfoWave: {}  LfoPitchModSens: {}",
            self.lfo.speed,
            self.lfo.delay,
            self.lfo.pitch_mod_depth,
            self.lfo.amp_mod_depth,
            self.lfo.sync,
            self.lfo.waveform,
            self.lfo.pitch_mod_sensitivity
        )
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.header();
        if let Some(name) = &self.file_name {
            writeln!(f, "File: {}", name)?;
        }
        writeln!(f, "Start: {:02X}", h.start)?;
        writeln!(f, "Manufacturer: {:02X}", h.manufacturer)?;
        writeln!(f, "Status and Channel: {:02X}", h.status_and_channel)?;
        writeln!(f, "Format: {:02X}", h.format)?;
        writeln!(f, "Size: {}", h.size)?;
        writeln!(f, "Voice Count: {}", self.voices.len())?;
        for (i, voice) in self.voices.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "[{}] {}", i + 1, voice)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Checksum: {:02X}{}",
            self.checksum,
            if self.checksum_ok() { "" } else { " (mismatch)" }
        )?;
        write!(f, "End: {:02X}", self.end)
    }
}

#[cfg(test)]
mod tests {
    use crate::bank::{encode_single, Bank};
    use crate::patch::Voice;

    #[test]
    fn test_voice_dump_lists_fields() {
        let voice = Voice::init().with_source("ROM1A.SYX");
        let text = voice.to_string();
        assert!(text.starts_with("Name: INIT VOICE    File: ROM1A.SYX"));
        for n in 1..=6 {
            assert!(text.contains(&format!("Operator {}", n)));
        }
        for field in ["FreqCoarse", "Detune", "PitchEGLevel", "LfoWave", "Transpose"] {
            assert!(text.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_bank_dump() {
        let bank = Bank::decode(encode_single(&Voice::init(), 0)).unwrap();
        let text = bank.to_string();
        assert!(text.contains("Format: 00"));
        assert!(text.contains("Size: 155"));
        assert!(text.contains("Voice Count: 1"));
        assert!(text.ends_with("End: F7"));
        assert!(!text.contains("mismatch"));
    }
}
