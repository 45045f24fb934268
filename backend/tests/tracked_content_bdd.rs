//! Behaviour tests for tracked-content persistence.
//!
//! These scenarios record uploads and downloads for a tracking session and
//! check that the binary and JSON encodings hand back the same record.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use tracking_backend::domain::ports::TrackedContentRepository;
use tracking_backend::domain::{
    AccessChannel, ContentEntry, StoreKey, TrackedContent, TrackingKey,
};
use tracking_backend::outbound::InMemoryTrackedContentRepository;
use tracking_backend::outbound::codec::json;

struct TrackedContentWorld {
    runtime: Runtime,
    repository: InMemoryTrackedContentRepository,
    content: RefCell<Option<TrackedContent>>,
    reloaded: RefCell<Option<Option<TrackedContent>>>,
}

impl TrackedContentWorld {
    fn new() -> Self {
        Self {
            runtime: Runtime::new().expect("create runtime"),
            repository: InMemoryTrackedContentRepository::new(),
            content: RefCell::new(None),
            reloaded: RefCell::new(None),
        }
    }

    fn start(&self, id: &str) {
        let key = TrackingKey::new(id).expect("valid tracking id");
        *self.content.borrow_mut() = Some(TrackedContent::new(key));
    }

    fn record(&self, path: &str, store: &str, upload: bool) {
        let store_key: StoreKey = store.parse().expect("valid store key");
        let entry = ContentEntry::new(store_key, AccessChannel::Native, path);
        let mut content = self.content.borrow_mut();
        let content = content.as_mut().expect("tracking session started");
        let inserted = if upload {
            content.add_upload(entry)
        } else {
            content.add_download(entry)
        };
        assert!(inserted, "each recorded entry is new");
    }

    fn key(&self) -> TrackingKey {
        self.content
            .borrow()
            .as_ref()
            .expect("tracking session started")
            .key()
            .clone()
    }

    fn save_and_reload(&self) {
        let content = self.content.borrow().clone().expect("tracking session started");
        let reloaded = self.runtime.block_on(async {
            self.repository.save(&content).await.expect("save succeeds");
            self.repository
                .load(content.key())
                .await
                .expect("load succeeds")
        });
        *self.reloaded.borrow_mut() = Some(reloaded);
    }

    fn load_only(&self) {
        let key = self.key();
        let reloaded = self
            .runtime
            .block_on(self.repository.load(&key))
            .expect("load succeeds");
        *self.reloaded.borrow_mut() = Some(reloaded);
    }

    fn json_round_trip(&self) {
        let content = self.content.borrow().clone().expect("tracking session started");
        let text = json::encode(&content).expect("encode succeeds");
        let decoded = json::decode(&text).expect("decode succeeds");
        *self.reloaded.borrow_mut() = Some(Some(decoded));
    }

    fn with_reloaded<F>(&self, f: F)
    where
        F: FnOnce(&TrackedContent),
    {
        let reloaded = self.reloaded.borrow();
        let content = reloaded
            .as_ref()
            .expect("reload performed")
            .as_ref()
            .expect("session found");
        f(content);
    }
}

#[fixture]
fn world() -> TrackedContentWorld {
    TrackedContentWorld::new()
}

#[given("a tracking session {id}")]
fn a_tracking_session(world: &TrackedContentWorld, id: String) {
    world.start(&id);
}

#[given("a download of {path} from {store}")]
fn a_download_of(world: &TrackedContentWorld, path: String, store: String) {
    world.record(&path, &store, false);
}

#[given("an upload of {path} to {store}")]
fn an_upload_of(world: &TrackedContentWorld, path: String, store: String) {
    world.record(&path, &store, true);
}

#[when("the session is saved and reloaded")]
fn the_session_is_saved_and_reloaded(world: &TrackedContentWorld) {
    world.save_and_reload();
}

#[when("the session is encoded as JSON and decoded")]
fn the_session_is_encoded_as_json_and_decoded(world: &TrackedContentWorld) {
    world.json_round_trip();
}

#[when("the session is loaded without saving")]
fn the_session_is_loaded_without_saving(world: &TrackedContentWorld) {
    world.load_only();
}

#[then("the reloaded session has key {id}")]
fn the_reloaded_session_has_key(world: &TrackedContentWorld, id: String) {
    world.with_reloaded(|content| assert_eq!(content.key().id(), id));
}

#[then("the reloaded session has {count} downloads")]
fn the_reloaded_session_has_downloads(world: &TrackedContentWorld, count: usize) {
    let original = world.content.borrow().clone().expect("tracking session started");
    world.with_reloaded(|content| {
        assert_eq!(content.downloads().len(), count);
        assert_eq!(content.downloads(), original.downloads());
    });
}

#[then("the reloaded session has {count} uploads")]
fn the_reloaded_session_has_uploads(world: &TrackedContentWorld, count: usize) {
    let original = world.content.borrow().clone().expect("tracking session started");
    world.with_reloaded(|content| {
        assert_eq!(content.uploads().len(), count);
        assert_eq!(content.uploads(), original.uploads());
    });
}

#[then("the reloaded session contains every recorded entry")]
fn the_reloaded_session_contains_every_recorded_entry(world: &TrackedContentWorld) {
    let original = world.content.borrow().clone().expect("tracking session started");
    world.with_reloaded(|content| {
        for entry in original.uploads() {
            assert!(content.uploads().contains(entry), "missing upload {entry:?}");
        }
        for entry in original.downloads() {
            assert!(content.downloads().contains(entry), "missing download {entry:?}");
        }
    });
}

#[then("no session is found")]
fn no_session_is_found(world: &TrackedContentWorld) {
    let reloaded = world.reloaded.borrow();
    assert!(matches!(reloaded.as_ref(), Some(None)));
}

#[scenario(
    path = "tests/features/tracked_content.feature",
    name = "Recorded downloads survive the binary round trip"
)]
fn recorded_downloads_survive_the_binary_round_trip(world: TrackedContentWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/tracked_content.feature",
    name = "Recorded uploads survive the JSON round trip"
)]
fn recorded_uploads_survive_the_json_round_trip(world: TrackedContentWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/tracked_content.feature",
    name = "A mixed session survives the wire round trip"
)]
fn a_mixed_session_survives_the_wire_round_trip(world: TrackedContentWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/tracked_content.feature",
    name = "Sessions that were never saved load as absent"
)]
fn sessions_that_were_never_saved_load_as_absent(world: TrackedContentWorld) {
    drop(world);
}
