use super::common::{harness, sample_listing};
use crate::agent::store::ListingStore;

#[test]
fn statistics_bucket_synonyms_and_keep_the_exact_breakdown() {
    let h = harness();
    let statuses = [
        "Applied",
        "Screening",
        "Interview",
        "Technical Test",
        "Offer Received",
        "Rejected",
        "Withdrawn",
    ];

    for (index, status) in statuses.iter().enumerate() {
        let listing = h
            .listings
            .add(sample_listing(&format!("Role {index}")))
            .expect("memory store accepts drafts");
        let application = h
            .service
            .create(h.profile.id, listing.id, None, None, None)
            .expect("create succeeds");
        if *status != "Applied" {
            h.service
                .update_status(application.id, status, None)
                .expect("transition succeeds");
        }
    }

    let stats = h.service.statistics(h.profile.id).expect("stats succeed");
    assert_eq!(stats.total, 7);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.interviews, 2);
    assert_eq!(stats.offers, 1);
    assert_eq!(stats.rejected, 1);

    // Withdrawn has no bucket but still shows up in the exact breakdown, so
    // the breakdown always accounts for every application.
    assert_eq!(stats.by_status.get("Withdrawn"), Some(&1));
    assert_eq!(stats.by_status.get("TechnicalTest"), Some(&1));
    assert_eq!(stats.by_status.values().sum::<usize>(), stats.total);
}

#[test]
fn statistics_reflect_the_latest_status_only() {
    let h = harness();
    let application = h
        .service
        .create(h.profile.id, h.listing.id, None, None, None)
        .expect("create succeeds");
    h.service
        .update_status(application.id, "Interview", None)
        .expect("transition succeeds");
    h.service
        .update_status(application.id, "Rejected", None)
        .expect("transition succeeds");

    let stats = h.service.statistics(h.profile.id).expect("stats succeed");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.interviews, 0);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.by_status.get("Rejected"), Some(&1));
    assert_eq!(stats.by_status.get("Interview"), None);
}

#[test]
fn profile_without_applications_has_zeroed_statistics() {
    let h = harness();

    let stats = h.service.statistics(h.profile.id).expect("stats succeed");
    assert_eq!(stats.total, 0);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.interviews, 0);
    assert_eq!(stats.offers, 0);
    assert_eq!(stats.rejected, 0);
    assert!(stats.by_status.is_empty());
}
