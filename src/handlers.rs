pub mod cash;
pub mod clients;
pub mod deliveries;
pub mod incidents;
pub mod orders;
pub mod payments;
pub mod products;
pub mod rentals;

use rust_decimal::Decimal;
use validator::ValidationError;

// Validação customizada compartilhada: `range` do validator não cobre
// Decimal, então checamos o sinal na mão.
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_decimals_are_rejected() {
        assert!(validate_not_negative(&dec!(-0.01)).is_err());
        assert!(validate_not_negative(&dec!(0)).is_ok());
        assert!(validate_not_negative(&dec!(10.50)).is_ok());
    }
}
