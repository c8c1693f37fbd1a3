//! Tests for the metric service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use mockable::Clock;
use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::MockMetricRepository;
use crate::domain::{AirQuality, ErrorCode};

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn reading() -> MetricReading {
    MetricReading::new(21.5, 45.0, AirQuality::Good).expect("valid reading")
}

fn make_service(repo: MockMetricRepository) -> MetricsService<MockMetricRepository> {
    MetricsService::new(Arc::new(repo), Arc::new(FixtureClock(fixture_timestamp())))
}

#[rstest]
#[tokio::test]
async fn record_metric_stamps_owner_and_clock(reading: MetricReading) {
    let user_id = UserId::random();
    let expected_user = user_id.clone();

    let mut repo = MockMetricRepository::new();
    repo.expect_insert()
        .times(1)
        .withf(move |metric| {
            metric.user_id() == &expected_user && metric.timestamp() == fixture_timestamp()
        })
        .return_once(|_| Ok(()));

    let metric = make_service(repo)
        .record_metric(&user_id, reading)
        .await
        .expect("metric recorded");

    assert_eq!(metric.user_id(), &user_id);
    assert_eq!(metric.reading(), &reading);
    assert_eq!(metric.timestamp(), fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn record_metric_keeps_microsecond_timestamps(reading: MetricReading) {
    let clock_time = fixture_timestamp()
        .with_nanosecond(123_456_789)
        .expect("valid nanosecond");
    let stored_time = fixture_timestamp()
        .with_nanosecond(123_456_000)
        .expect("valid nanosecond");

    let mut repo = MockMetricRepository::new();
    repo.expect_insert()
        .times(1)
        .withf(move |metric| metric.timestamp() == stored_time)
        .return_once(|_| Ok(()));
    let service = MetricsService::new(Arc::new(repo), Arc::new(FixtureClock(clock_time)));

    let metric = service
        .record_metric(&UserId::random(), reading)
        .await
        .expect("metric recorded");

    assert_eq!(metric.timestamp(), stored_time);
    let json = serde_json::to_value(&metric).expect("serialise metric");
    assert_eq!(json["timestamp"], "2026-03-01T08:15:00.123456Z");
}

#[rstest]
#[tokio::test]
async fn identical_records_get_distinct_ids(reading: MetricReading) {
    let user_id = UserId::random();
    let mut repo = MockMetricRepository::new();
    repo.expect_insert().times(2).returning(|_| Ok(()));
    let service = make_service(repo);

    let first = service.record_metric(&user_id, reading).await.expect("first");
    let second = service.record_metric(&user_id, reading).await.expect("second");

    assert_ne!(first.id(), second.id());
}

#[rstest]
#[case(MetricRepositoryError::connection("pool exhausted"))]
#[case(MetricRepositoryError::query("insert failed"))]
#[tokio::test]
async fn record_metric_maps_storage_faults_to_internal(
    reading: MetricReading,
    #[case] failure: MetricRepositoryError,
) {
    let mut repo = MockMetricRepository::new();
    repo.expect_insert().times(1).return_once(move |_| Err(failure));

    let error = make_service(repo)
        .record_metric(&UserId::random(), reading)
        .await
        .expect_err("storage fault");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn latest_metric_returns_not_found_for_empty_history() {
    let user_id = UserId::random();
    let mut repo = MockMetricRepository::new();
    repo.expect_latest_for_user()
        .with(eq(user_id.clone()))
        .times(1)
        .return_once(|_| Ok(None));

    let error = make_service(repo)
        .latest_metric(&user_id)
        .await
        .expect_err("no metrics");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn latest_metric_returns_stored_metric(reading: MetricReading) {
    let user_id = UserId::random();
    let stored = Metric::from_parts(Uuid::new_v4(), user_id.clone(), reading, fixture_timestamp());
    let returned = stored.clone();

    let mut repo = MockMetricRepository::new();
    repo.expect_latest_for_user()
        .times(1)
        .return_once(move |_| Ok(Some(returned)));

    let metric = make_service(repo)
        .latest_metric(&user_id)
        .await
        .expect("latest metric");

    assert_eq!(metric, stored);
}

#[tokio::test]
async fn metric_history_requests_ten_records() {
    let user_id = UserId::random();
    let mut repo = MockMetricRepository::new();
    repo.expect_recent_for_user()
        .with(always(), eq(METRIC_HISTORY_LIMIT))
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let history = make_service(repo)
        .metric_history(&user_id)
        .await
        .expect("history");

    assert!(history.is_empty());
}

#[tokio::test]
async fn metric_history_maps_storage_faults_to_internal() {
    let mut repo = MockMetricRepository::new();
    repo.expect_recent_for_user()
        .times(1)
        .return_once(|_, _| Err(MetricRepositoryError::connection("refused")));

    let error = make_service(repo)
        .metric_history(&UserId::random())
        .await
        .expect_err("storage fault");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
