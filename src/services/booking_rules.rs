// src/services/booking_rules.rs
//
// Regras de validação de uma reserva contra o salão e as datas propostas.
// Todas rodam antes de qualquer escrita: ação rejeitada não persiste nada.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{reservation::PricingMode, venue::Room},
};

/// Capacidade: o número de convidados nunca pode passar do limite do salão.
/// Checada na criação e em qualquer atualização que toque convidados ou salão.
pub fn check_capacity(number_of_guests: i32, room: &Room) -> Result<(), AppError> {
    if number_of_guests > room.max_capacity {
        return Err(AppError::CapacityExceeded(room.max_capacity));
    }
    Ok(())
}

/// O sinal vence no máximo na véspera do evento (a véspera em si é aceita).
/// Só é checada quando o sinal é exigido e tem data informada.
pub fn check_deposit_due_date(
    deposit_due_date: NaiveDate,
    event_date: NaiveDate,
) -> Result<(), AppError> {
    let day_before = event_date
        .pred_opt()
        .ok_or_else(|| anyhow::anyhow!("Data do evento fora do calendário: {event_date}"))?;

    if deposit_due_date > day_before {
        return Err(AppError::InvalidDepositTiming);
    }
    Ok(())
}

/// O campo de preço correspondente ao modo escolhido é obrigatório.
pub fn check_pricing_fields(
    mode: PricingMode,
    price_per_person: Option<Decimal>,
    total_price: Option<Decimal>,
) -> Result<(), AppError> {
    let present = match mode {
        PricingMode::PerPerson => price_per_person.is_some(),
        PricingMode::Flat => total_price.is_some(),
    };
    if !present {
        return Err(AppError::InvalidPricingInput);
    }
    Ok(())
}

/// Sinal exigido precisa de valor e data de vencimento.
pub fn check_deposit_fields(
    deposit_required: bool,
    deposit_amount: Option<Decimal>,
    deposit_due_date: Option<NaiveDate>,
) -> Result<(), AppError> {
    if deposit_required && (deposit_amount.is_none() || deposit_due_date.is_none()) {
        return Err(AppError::MissingDepositDetails);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use super::*;

    fn room(max_capacity: i32) -> Room {
        Room {
            id: Uuid::new_v4(),
            name: "Salão Cristal".to_string(),
            description: None,
            max_capacity,
            price_per_person: Decimal::from(150),
            total_price: Decimal::from(8000),
            is_active: true,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_capacity_within_limit() {
        assert!(check_capacity(40, &room(40)).is_ok());
        assert!(check_capacity(1, &room(40)).is_ok());
    }

    #[test]
    fn test_capacity_exceeded_carries_limit() {
        match check_capacity(41, &room(40)) {
            Err(AppError::CapacityExceeded(max)) => assert_eq!(max, 40),
            other => panic!("esperava CapacityExceeded, veio {other:?}"),
        }
    }

    #[test]
    fn test_deposit_due_on_day_before_is_accepted() {
        // Limite inclusivo: a véspera vale
        assert!(check_deposit_due_date(date("2026-03-14"), date("2026-03-15")).is_ok());
        assert!(check_deposit_due_date(date("2026-03-01"), date("2026-03-15")).is_ok());
    }

    #[test]
    fn test_deposit_due_on_event_date_is_rejected() {
        assert!(matches!(
            check_deposit_due_date(date("2026-03-15"), date("2026-03-15")),
            Err(AppError::InvalidDepositTiming)
        ));
        assert!(matches!(
            check_deposit_due_date(date("2026-03-16"), date("2026-03-15")),
            Err(AppError::InvalidDepositTiming)
        ));
    }

    #[test]
    fn test_pricing_fields_must_match_mode() {
        let price = Some(Decimal::from(150));

        assert!(check_pricing_fields(PricingMode::PerPerson, price, None).is_ok());
        assert!(check_pricing_fields(PricingMode::Flat, None, price).is_ok());

        assert!(matches!(
            check_pricing_fields(PricingMode::PerPerson, None, price),
            Err(AppError::InvalidPricingInput)
        ));
        assert!(matches!(
            check_pricing_fields(PricingMode::Flat, price, None),
            Err(AppError::InvalidPricingInput)
        ));
    }

    #[test]
    fn test_deposit_fields_required_together() {
        let amount = Some(Decimal::from(1000));
        let due = Some(date("2026-03-10"));

        assert!(check_deposit_fields(false, None, None).is_ok());
        assert!(check_deposit_fields(true, amount, due).is_ok());

        assert!(matches!(
            check_deposit_fields(true, None, due),
            Err(AppError::MissingDepositDetails)
        ));
        assert!(matches!(
            check_deposit_fields(true, amount, None),
            Err(AppError::MissingDepositDetails)
        ));
    }
}
