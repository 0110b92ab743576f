use petshelter_core::{ContentUri, ContentValues, PetProvider, ShelterConfig};
use std::sync::{Arc, Mutex};

fn provider() -> PetProvider {
    PetProvider::open(&ShelterConfig::in_memory()).unwrap()
}

fn recorder(provider: &PetProvider, uri: ContentUri, descendants: bool) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    provider.notifier().register(
        uri,
        descendants,
        Arc::new(move |changed: &ContentUri| {
            sink.lock().unwrap().push(changed.to_string());
        }),
    );
    seen
}

fn named(name: &str) -> ContentValues {
    let mut values = ContentValues::new();
    values.put_str("name", name).put_i64("gender", 2);
    values
}

#[test]
fn insert_notifies_collection_observers() {
    let provider = provider();
    let seen = recorder(&provider, ContentUri::pets(), false);

    provider.insert(&ContentUri::pets(), &named("Luna")).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        ["content://com.example.android.pets/pets"]
    );
}

#[test]
fn rejected_and_failed_inserts_do_not_notify() {
    let provider = provider();
    let seen = recorder(&provider, ContentUri::pets(), true);

    assert!(provider.insert(&ContentUri::pets(), &named("")).is_err());
    let mut no_gender = ContentValues::new();
    no_gender.put_str("name", "Luna");
    assert!(provider
        .insert(&ContentUri::pets(), &no_gender)
        .unwrap()
        .is_none());

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn empty_update_is_rejected_without_notifying() {
    let provider = provider();
    provider.insert(&ContentUri::pets(), &named("Luna")).unwrap();
    let seen = recorder(&provider, ContentUri::pets(), true);

    assert!(provider
        .update(&ContentUri::pets(), &ContentValues::new(), None)
        .is_err());

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn update_and_delete_notify_even_when_nothing_matched() {
    let provider = provider();
    let missing = ContentUri::pets().with_appended_id(77);
    let seen = recorder(&provider, missing.clone(), false);

    let mut values = ContentValues::new();
    values.put_i64("weight", 4);
    assert_eq!(provider.update(&missing, &values, None).unwrap(), 0);
    assert_eq!(provider.delete(&missing, None).unwrap(), 0);

    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn item_changes_reach_descendant_observers_only() {
    let provider = provider();
    let uri = provider
        .insert(&ContentUri::pets(), &named("Luna"))
        .unwrap()
        .unwrap();
    let flat = recorder(&provider, ContentUri::pets(), false);
    let deep = recorder(&provider, ContentUri::pets(), true);

    provider.delete(&uri, None).unwrap();

    assert!(flat.lock().unwrap().is_empty());
    assert_eq!(*deep.lock().unwrap(), [uri.to_string()]);
}

#[test]
fn observers_can_requery_from_callback() {
    let provider = Arc::new(provider());
    let counts = Arc::new(Mutex::new(Vec::new()));

    let reader = Arc::clone(&provider);
    let sink = Arc::clone(&counts);
    provider.notifier().register(
        ContentUri::pets(),
        true,
        Arc::new(move |changed: &ContentUri| {
            let cursor = reader.query(changed, None, None, None).unwrap();
            sink.lock().unwrap().push(cursor.len());
        }),
    );

    provider.insert(&ContentUri::pets(), &named("Luna")).unwrap();
    provider.insert(&ContentUri::pets(), &named("Nova")).unwrap();

    assert_eq!(*counts.lock().unwrap(), [1, 2]);
}
