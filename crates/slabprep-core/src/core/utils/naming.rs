use super::format::plain_float;

/// Derives a run name of the form `<prefix>_H<gap>_rho0_<digits>`.
///
/// `<gap>` is the fluid gap truncated to an integer and `<digits>` are the fractional
/// digits of the fluid density as it is written in the parameter file, so `0.8`
/// yields `8` and `0.05` yields `05`.
pub fn derive_simulation_name(prefix: &str, fluid_gap: f64, rho_fluid: f64) -> String {
    let gap = fluid_gap.trunc() as i64;
    let rho = plain_float(rho_fluid);
    let digits = rho.split_once('.').map_or("0", |(_, frac)| frac);
    format!("{prefix}_H{gap}_rho0_{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_name_from_gap_and_density() {
        assert_eq!(derive_simulation_name("WCA", 8.0, 0.8), "WCA_H8_rho0_8");
        assert_eq!(derive_simulation_name("LJ", 12.7, 0.75), "LJ_H12_rho0_75");
    }

    #[test]
    fn keeps_leading_zeros_of_the_density_fraction() {
        assert_eq!(derive_simulation_name("WCA", 10.0, 0.05), "WCA_H10_rho0_05");
    }
}
