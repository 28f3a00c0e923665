// src/services/pricing.rs
//
// Cálculo do valor final da reserva. Funções puras, sem I/O:
// tudo que depende do banco fica no serviço de reservas.

use rust_decimal::Decimal;

use crate::models::reservation::PricingMode;

// Horas incluídas no pacote padrão de um evento
pub const STANDARD_EVENT_HOURS: i32 = 6;

/// Valor a pagar pela reserva, sempre com duas casas decimais.
///
/// - Por pessoa: convidados x preço unitário (preço ausente rende 0;
///   a completude do modo é validada antes, em `booking_rules`).
/// - Fechado: o preço total informado, ou 0 se ausente.
pub fn calculate_final_amount(
    mode: PricingMode,
    number_of_guests: i32,
    price_per_person: Option<Decimal>,
    total_price: Option<Decimal>,
) -> Decimal {
    let amount = match mode {
        PricingMode::PerPerson => {
            Decimal::from(number_of_guests) * price_per_person.unwrap_or(Decimal::ZERO)
        }
        PricingMode::Flat => total_price.unwrap_or(Decimal::ZERO),
    };
    amount.round_dp(2)
}

/// Nota automática de horas extras, recalculada sempre que a duração muda.
/// É um campo do sistema: sobrescreve qualquer nota automática anterior.
pub fn extra_hours_note(duration_hours: i32) -> Option<String> {
    if duration_hours <= STANDARD_EVENT_HOURS {
        return None;
    }
    let extra = duration_hours - STANDARD_EVENT_HOURS;
    Some(format!(
        "Additional billable hours: {extra} (beyond the standard 6h)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_per_person_amount() {
        let amount =
            calculate_final_amount(PricingMode::PerPerson, 38, Some(dec("150.00")), None);
        assert_eq!(amount, dec("5700.00"));
    }

    #[test]
    fn test_per_person_without_unit_price_is_zero() {
        let amount = calculate_final_amount(PricingMode::PerPerson, 38, None, None);
        assert_eq!(amount, Decimal::ZERO);
    }

    #[test]
    fn test_flat_amount() {
        // No modo fechado o número de convidados não entra na conta
        let amount =
            calculate_final_amount(PricingMode::Flat, 120, Some(dec("150.00")), Some(dec("8000.00")));
        assert_eq!(amount, dec("8000.00"));
    }

    #[test]
    fn test_flat_without_total_is_zero() {
        let amount = calculate_final_amount(PricingMode::Flat, 10, None, None);
        assert_eq!(amount, Decimal::ZERO);
    }

    #[test]
    fn test_no_rounding_drift() {
        // 33 x 99.99 = 3299.67, exato em decimal
        let amount =
            calculate_final_amount(PricingMode::PerPerson, 33, Some(dec("99.99")), None);
        assert_eq!(amount, dec("3299.67"));
    }

    #[test]
    fn test_no_note_within_standard_hours() {
        assert_eq!(extra_hours_note(1), None);
        assert_eq!(extra_hours_note(6), None);
    }

    #[test]
    fn test_note_beyond_standard_hours() {
        assert_eq!(
            extra_hours_note(8).as_deref(),
            Some("Additional billable hours: 2 (beyond the standard 6h)")
        );
        assert_eq!(
            extra_hours_note(9).as_deref(),
            Some("Additional billable hours: 3 (beyond the standard 6h)")
        );
    }
}
