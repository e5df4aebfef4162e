// src/services/settlement.rs
//
// Aritmética pura da liquidação de garantia. O RentalService busca os
// dados dentro da transação e delega o cálculo para cá.

use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::models::orders::OrderDepositState;
use crate::models::rentals::RentalDepositState;

// Linha de custo: incidente resolvido com reposição + preço do item.
#[derive(Debug, Clone, FromRow)]
pub struct IncidentCharge {
    pub quantity_affected: i32,
    pub quantity_replaced: i32,
    pub unit_price: Decimal,
}

impl IncidentCharge {
    /// Unidades cobradas: a quantidade reposta, ou a afetada quando a
    /// resolução não informou reposição.
    fn charged_units(&self) -> i32 {
        if self.quantity_replaced > 0 {
            self.quantity_replaced
        } else {
            self.quantity_affected
        }
    }

    pub fn cost(&self) -> Decimal {
        Decimal::from(self.charged_units()) * self.unit_price
    }
}

pub fn total_incident_cost(charges: &[IncidentCharge]) -> Decimal {
    charges.iter().map(IncidentCharge::cost).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositSettlement {
    pub applied: Decimal,
    pub returned: Decimal,
    pub deposit_state: RentalDepositState,
}

/// Decide o destino da garantia retida frente ao custo de incidentes:
/// sem garantia não há movimento; sem custo devolve-se tudo; custo
/// parcial divide; custo maior ou igual consome a garantia inteira.
pub fn settle_deposit(deposit_total: Decimal, incident_cost: Decimal) -> DepositSettlement {
    if deposit_total <= Decimal::ZERO {
        // Nada foi retido: só marca o desfecho
        let deposit_state = if incident_cost > Decimal::ZERO {
            RentalDepositState::Applied
        } else {
            RentalDepositState::Returned
        };
        return DepositSettlement {
            applied: Decimal::ZERO,
            returned: Decimal::ZERO,
            deposit_state,
        };
    }

    if incident_cost <= Decimal::ZERO {
        return DepositSettlement {
            applied: Decimal::ZERO,
            returned: deposit_total,
            deposit_state: RentalDepositState::Returned,
        };
    }

    if incident_cost < deposit_total {
        return DepositSettlement {
            applied: incident_cost,
            returned: deposit_total - incident_cost,
            deposit_state: RentalDepositState::Applied,
        };
    }

    DepositSettlement {
        applied: deposit_total,
        returned: Decimal::ZERO,
        deposit_state: RentalDepositState::Applied,
    }
}

/// O mesmo desfecho visto do lado do pedido ("deducted" em vez de "applied").
pub fn order_deposit_state(state: RentalDepositState) -> OrderDepositState {
    match state {
        RentalDepositState::Pending => OrderDepositState::Pending,
        RentalDepositState::Returned => OrderDepositState::Returned,
        RentalDepositState::Applied => OrderDepositState::Deducted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn charge(affected: i32, replaced: i32, price: Decimal) -> IncidentCharge {
        IncidentCharge {
            quantity_affected: affected,
            quantity_replaced: replaced,
            unit_price: price,
        }
    }

    #[test]
    fn cost_uses_replaced_units_with_affected_fallback() {
        assert_eq!(charge(2, 1, dec!(100.00)).cost(), dec!(100.00));
        // Sem quantidade reposta informada cobra-se o afetado
        assert_eq!(charge(2, 0, dec!(100.00)).cost(), dec!(200.00));
        assert_eq!(
            total_incident_cost(&[charge(2, 1, dec!(100.00)), charge(3, 0, dec!(10.00))]),
            dec!(130.00)
        );
        assert_eq!(total_incident_cost(&[]), Decimal::ZERO);
    }

    #[test]
    fn no_deposit_collected_means_no_money_moves() {
        let s = settle_deposit(dec!(0), dec!(0));
        assert_eq!(s.applied, Decimal::ZERO);
        assert_eq!(s.returned, Decimal::ZERO);
        assert_eq!(s.deposit_state, RentalDepositState::Returned);

        let s = settle_deposit(dec!(0), dec!(80));
        assert_eq!(s.applied, Decimal::ZERO);
        assert_eq!(s.returned, Decimal::ZERO);
        assert_eq!(s.deposit_state, RentalDepositState::Applied);
    }

    #[test]
    fn full_refund_when_there_is_no_damage() {
        let s = settle_deposit(dec!(30.00), dec!(0));
        assert_eq!(s.applied, Decimal::ZERO);
        assert_eq!(s.returned, dec!(30.00));
        assert_eq!(s.deposit_state, RentalDepositState::Returned);
    }

    #[test]
    fn partial_damage_splits_the_deposit() {
        let s = settle_deposit(dec!(100.00), dec!(40.00));
        assert_eq!(s.applied, dec!(40.00));
        assert_eq!(s.returned, dec!(60.00));
        assert_eq!(s.deposit_state, RentalDepositState::Applied);
    }

    #[test]
    fn damage_at_or_above_deposit_consumes_everything() {
        let s = settle_deposit(dec!(30.00), dec!(100.00));
        assert_eq!(s.applied, dec!(30.00));
        assert_eq!(s.returned, Decimal::ZERO);
        assert_eq!(s.deposit_state, RentalDepositState::Applied);

        let s = settle_deposit(dec!(30.00), dec!(30.00));
        assert_eq!(s.applied, dec!(30.00));
        assert_eq!(s.returned, Decimal::ZERO);
    }

    // Para qualquer par (garantia, custo) >= 0 vale
    // applied + returned <= garantia, e os casos extremos batem com as
    // fórmulas fechadas.
    #[test]
    fn settlement_is_conservative_over_a_grid() {
        let values = [
            dec!(0),
            dec!(0.01),
            dec!(10),
            dec!(29.99),
            dec!(30),
            dec!(30.01),
            dec!(100),
            dec!(12345.67),
        ];
        for deposit in values {
            for cost in values {
                let s = settle_deposit(deposit, cost);
                assert!(s.applied >= Decimal::ZERO);
                assert!(s.returned >= Decimal::ZERO);
                assert!(
                    s.applied + s.returned <= deposit.max(Decimal::ZERO),
                    "deposit={deposit} cost={cost}"
                );
                if deposit > Decimal::ZERO {
                    if cost >= deposit {
                        assert_eq!(s.applied, deposit);
                        assert_eq!(s.returned, Decimal::ZERO);
                    } else if cost == Decimal::ZERO {
                        assert_eq!(s.applied, Decimal::ZERO);
                        assert_eq!(s.returned, deposit);
                    } else {
                        assert_eq!(s.applied, cost);
                        assert_eq!(s.returned, deposit - cost);
                    }
                }
            }
        }
    }

    #[test]
    fn order_side_naming_maps_applied_to_deducted() {
        assert_eq!(
            order_deposit_state(RentalDepositState::Pending),
            OrderDepositState::Pending
        );
        assert_eq!(
            order_deposit_state(RentalDepositState::Returned),
            OrderDepositState::Returned
        );
        assert_eq!(
            order_deposit_state(RentalDepositState::Applied),
            OrderDepositState::Deducted
        );
    }
}
