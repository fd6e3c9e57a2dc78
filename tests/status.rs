use farm_distribution_api::{
    error::AppError,
    status::{OrderStatus, ShipmentStatus},
};

#[test]
fn order_status_lifecycle() {
    use OrderStatus::*;
    assert!(Pending.can_transition_to(Sending));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(Sending.can_transition_to(Confirmed));
    assert!(Confirmed.can_transition_to(Completed));
    assert!(Confirmed.can_transition_to(Cancelled));

    assert!(!Pending.can_transition_to(Completed));
    assert!(!Sending.can_transition_to(Pending));
    assert!(!Pending.can_transition_to(Pending));
}

#[test]
fn terminal_order_states_go_nowhere() {
    for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
        assert!(from.is_terminal());
        for to in OrderStatus::ALL {
            assert!(!from.can_transition_to(to), "{from} -> {to}");
        }
    }
}

#[test]
fn illegal_order_transition_is_bad_request() {
    let err = OrderStatus::Completed
        .ensure_transition(OrderStatus::Pending)
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn proof_of_transfer_only_before_confirmation() {
    assert!(OrderStatus::Pending.accepts_proof_of_transfer());
    assert!(OrderStatus::Sending.accepts_proof_of_transfer());
    assert!(!OrderStatus::Confirmed.accepts_proof_of_transfer());
    assert!(!OrderStatus::Cancelled.accepts_proof_of_transfer());
}

#[test]
fn order_status_parses_case_insensitively() {
    assert_eq!("confirmed".parse::<OrderStatus>().unwrap(), OrderStatus::Confirmed);
    assert_eq!(" Sending ".parse::<OrderStatus>().unwrap(), OrderStatus::Sending);
    assert!(matches!(
        "shipped".parse::<OrderStatus>(),
        Err(AppError::BadRequest(_))
    ));
    assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
}

#[test]
fn shipment_status_lifecycle() {
    use ShipmentStatus::*;
    assert!(Pending.can_transition_to(Dikirim));
    assert!(Pending.can_transition_to(Dibatalkan));
    assert!(Dikirim.can_transition_to(Diterima));
    assert!(Dikirim.can_transition_to(Dibatalkan));

    assert!(!Pending.can_transition_to(Diterima));
    assert!(!Diterima.can_transition_to(Dikirim));
    assert!(!Dibatalkan.can_transition_to(Pending));
    assert!(Diterima.ensure_transition(Dibatalkan).is_err());
}

#[test]
fn shipment_status_round_trips_through_its_literal() {
    for status in ShipmentStatus::ALL {
        assert_eq!(status.as_str().parse::<ShipmentStatus>().unwrap(), status);
    }
    assert!("delivered".parse::<ShipmentStatus>().is_err());
}
