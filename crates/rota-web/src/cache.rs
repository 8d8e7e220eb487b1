//! Time-boxed read-through cache for the person picker.
//!
//! The assignment dropdowns on the event detail page need the full eligible-
//! person list on every render; the list changes rarely. One cache slot,
//! one value (the list), one expiry (a fixed TTL). There is no invalidation;
//! staleness is bounded by the TTL alone.

use std::time::{Duration, Instant};

use rota_core::people::Person;
use tokio::sync::Mutex;

pub struct PersonCache {
  ttl:   Duration,
  inner: Mutex<Option<(Instant, Vec<Person>)>>,
}

impl PersonCache {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, inner: Mutex::new(None) }
  }

  /// Return the cached list, refreshing through `fetch` when the slot is
  /// empty or older than the TTL.
  pub async fn get_or_refresh<F, Fut, E>(
    &self,
    fetch: F,
  ) -> Result<Vec<Person>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Person>, E>>,
  {
    let mut slot = self.inner.lock().await;

    if let Some((stamped_at, persons)) = slot.as_ref()
      && stamped_at.elapsed() < self.ttl
    {
      return Ok(persons.clone());
    }

    let fresh = fetch().await?;
    *slot = Some((Instant::now(), fresh.clone()));
    Ok(fresh)
  }
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use chrono::Utc;
  use rota_core::people::MemberStatus;
  use uuid::Uuid;

  use super::*;

  fn person(name: &str) -> Person {
    Person {
      person_id:  Uuid::new_v4(),
      name:       name.to_string(),
      club_id:    Uuid::new_v4(),
      status:     MemberStatus::Active,
      ldap_id:    Some(name.to_string()),
      updated_at: Utc::now(),
    }
  }

  #[tokio::test]
  async fn second_read_within_ttl_skips_the_fetch() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let cache = PersonCache::new(Duration::from_secs(60));
    let calls = AtomicUsize::new(0);

    let first = cache
      .get_or_refresh(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Infallible>(vec![person("Anna")])
      })
      .await
      .unwrap();
    assert_eq!(first.len(), 1);

    let second = cache
      .get_or_refresh(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Infallible>(vec![person("Berta")])
      })
      .await
      .unwrap();

    assert_eq!(second[0].name, "Anna");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn expired_slot_is_refreshed() {
    let cache = PersonCache::new(Duration::from_millis(0));

    cache
      .get_or_refresh(|| async { Ok::<_, Infallible>(vec![person("Anna")]) })
      .await
      .unwrap();

    let refreshed = cache
      .get_or_refresh(|| async {
        Ok::<_, Infallible>(vec![person("Clara"), person("Doris")])
      })
      .await
      .unwrap();
    assert_eq!(refreshed.len(), 2);
  }

  #[tokio::test]
  async fn fetch_errors_propagate_and_do_not_poison_the_slot() {
    let cache = PersonCache::new(Duration::from_secs(60));

    let failed = cache
      .get_or_refresh(|| async { Err::<Vec<Person>, _>("db down") })
      .await;
    assert!(failed.is_err());

    let ok = cache
      .get_or_refresh(|| async { Ok::<_, &str>(vec![person("Anna")]) })
      .await
      .unwrap();
    assert_eq!(ok.len(), 1);
  }
}
