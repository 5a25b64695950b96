//! Final run output

use std::fmt;

use crate::simulation::states::NVec2;

/// Particle 0's final position and the system center of mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub particle0: NVec2,
    pub center_of_mass: NVec2,
}

impl fmt::Display for Report {
    /// Two lines, two decimals each
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:.2} {:.2}", self.particle0.x, self.particle0.y)?;
        write!(f, "{:.2} {:.2}", self.center_of_mass.x, self.center_of_mass.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_two_lines_with_two_decimals() {
        let r = Report {
            particle0: NVec2::new(0.123, 0.987),
            center_of_mass: NVec2::new(0.5, 0.0449),
        };
        assert_eq!(r.to_string(), "0.12 0.99\n0.50 0.04");
    }
}
