use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::*;
use crate::cocycle::{genus_two_generators, InterstitialCocycle, InterstitialDcel};
use crate::indexed::{IndexedDcel, IndexedMesh};
use crate::packing::steiner_initial_guess;
use crate::triangulations::{genus_two, one_holed_torus};

fn genus_two_bundle() -> (InterstitialDcel, EdgeLists, Packings) {
    let (d, g) = genus_two(5, 5).unwrap();
    let id = InterstitialDcel::new(d).unwrap();
    let mut chains = genus_two_generators(id.mesh(), g.t1, g.t2).unwrap();
    chains.insert("t1".into(), vec![g.t1]);
    let x0 = steiner_initial_guess(&id);
    let bumped: Vec<f64> = x0.iter().enumerate().map(|(k, v)| v + 1e-3 * k as f64).collect();
    (id, chains.into(), vec![x0, bumped].into())
}

#[test]
fn string_round_trip_preserves_numbering() {
    let (id, chains, packs) = genus_two_bundle();
    let doc = Document::new(&id, Some(&chains), Some(&packs), BTreeMap::new());
    let s = to_string(&doc).unwrap();
    let back: Loaded<InterstitialDcel> = from_str(&s).unwrap();

    let (a, b) = (id.indexed(), back.mesh.indexed());
    assert_eq!(a.uuid(), b.uuid());
    assert_eq!(a.mesh().num_vertices(), b.mesh().num_vertices());
    assert_eq!(a.mesh().num_faces(), b.mesh().num_faces());
    for e in a.mesh().edge_ids() {
        assert_eq!(a.mesh().edge(e), b.mesh().edge(e));
        assert_eq!(a.uidx(e), b.uidx(e));
    }
    for v in a.mesh().vertex_ids() {
        assert_eq!(a.mesh().vertex(v).leaving, b.mesh().vertex(v).leaving);
    }
    assert_eq!(back.edge_lists.as_ref(), Some(&chains));
    assert_eq!(back.packings.as_ref(), Some(&packs));
    assert_eq!(back.metadata, doc.metadata);

    // The reloaded mesh evaluates holonomy identically.
    let x = back.packings.as_ref().unwrap().get("1").unwrap();
    let ch = back.edge_lists.as_ref().unwrap().get("b2").unwrap();
    assert_eq!(id.hol(ch, x).unwrap(), back.mesh.hol(ch, x).unwrap());
}

#[test]
fn document_layout() {
    let (id, chains, packs) = genus_two_bundle();
    let extra = BTreeMap::from([("surface".to_string(), json!("genus two, größe 5"))]);
    let doc = Document::new(&id, Some(&chains), Some(&packs), extra);
    let v: Value = serde_json::from_str(&to_string(&doc).unwrap()).unwrap();

    let meta = &v["metadata"];
    assert_eq!(meta["schema"], "cpj");
    assert_eq!(meta["schema_version"], "0.0");
    assert_eq!(meta["surface"], "genus two, größe 5");
    assert!(meta["timestamp"].as_str().unwrap().ends_with('Z'));

    let dcel = &v["dcel"];
    assert_eq!(dcel["uuid"], id.indexed().uuid().to_string());
    assert_eq!(dcel["vertices"].as_array().unwrap().len(), 48);
    let e0 = &dcel["edges"][0];
    for key in ["src", "next", "prev", "twin", "face"] {
        assert!(e0.get(key).is_some(), "missing {key}");
    }

    assert_eq!(v["edge_lists"]["t1"].as_array().unwrap().len(), 1);
    let p = &v["packings"][0];
    assert_eq!(p["dtype"], "float64");
    assert_eq!(p["shape"], json!([id.nx()]));
    assert!(p["__ndarray__"].is_string());
}

#[test]
fn arrays_are_little_endian_base64() {
    let a = Float64Array::from_vec(vec![1.5, -2.0]);
    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(
        v,
        json!({"__ndarray__": "AAAAAAAA+D8AAAAAAAAAwA==", "dtype": "float64", "shape": [2]})
    );
    let one: Float64Array =
        serde_json::from_value(json!({"__ndarray__": "AAAAAAAA8D8=", "dtype": "<f8", "shape": [1]}))
            .unwrap();
    assert_eq!(one.values(), &[1.0]);

    let bad_dtype = json!({"__ndarray__": "AAAAAAAA8D8=", "dtype": "int64", "shape": [1]});
    assert!(serde_json::from_value::<Float64Array>(bad_dtype).is_err());
    let bad_shape = json!({"__ndarray__": "AAAAAAAA8D8=", "dtype": "float64", "shape": [2]});
    assert!(serde_json::from_value::<Float64Array>(bad_shape).is_err());
    assert!(Float64Array::with_shape(vec![0.0; 6], vec![2, 3]).is_ok());
}

#[test]
fn missing_and_null_sections() {
    let (d, _, _) = one_holed_torus(5, 5).unwrap();
    let id = IndexedDcel::new(d).unwrap();
    let s = to_string(&Document::new(&id, None, None, BTreeMap::new())).unwrap();
    let mut v: Value = serde_json::from_str(&s).unwrap();
    assert!(v["edge_lists"].is_null() && v["packings"].is_null());

    v.as_object_mut().unwrap().remove("packings");
    let back: Loaded<IndexedDcel> = from_str(&v.to_string()).unwrap();
    assert!(back.edge_lists.is_none() && back.packings.is_none());
    // Boundary half-edges keep their missing twins.
    let boundary = |m: &IndexedDcel| m.mesh().edge_ids().filter(|&e| m.mesh().is_boundary(e)).count();
    assert_eq!(boundary(&back.mesh), boundary(&id));
    assert_eq!(boundary(&id), 8);
}

#[test]
fn malformed_documents_are_rejected() {
    let (d, _, _) = one_holed_torus(5, 5).unwrap();
    let id = IndexedDcel::new(d).unwrap();
    let good: Value = serde_json::to_value(Document::new(&id, None, None, BTreeMap::new())).unwrap();

    let mut v = good.clone();
    v["dcel"]["edges"][3]["next"] = json!(100_000);
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::IndexOutOfRange { what: "edge.next", .. })
    ));

    let mut v = good.clone();
    // Point edge 0's twin at its own successor, which never pairs back.
    let next = v["dcel"]["edges"][0]["next"].clone();
    v["dcel"]["edges"][0]["twin"] = next;
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::Topology(_))
    ));

    let mut v = good.clone();
    v["metadata"]["schema"] = json!("obj");
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::Schema(_))
    ));

    let mut v = good.clone();
    v["edge_lists"] = json!({"far": [0, 100_000]});
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::IndexOutOfRange { what: "edge list", .. })
    ));

    let mut v = good;
    v["packings"] = serde_json::to_value(vec![Float64Array::from_vec(vec![1.0; 3])]).unwrap();
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::PackingLength { .. })
    ));

    assert!(matches!(from_str::<IndexedDcel>("{"), Err(SerializationError::Json(_))));
}

#[test]
fn bad_array_payloads_keep_their_error_kind() {
    let (d, _, _) = one_holed_torus(5, 5).unwrap();
    let id = IndexedDcel::new(d).unwrap();
    let good: Value = serde_json::to_value(Document::new(&id, None, None, BTreeMap::new())).unwrap();

    let mut v = good.clone();
    v["packings"] = json!([{"__ndarray__": "AAAAAAAA8D8=", "dtype": "int64", "shape": [1]}]);
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::Dtype(ref t)) if t == "int64"
    ));

    let mut v = good.clone();
    v["packings"] = json!({"x": {"__ndarray__": "not base64!", "dtype": "float64", "shape": [1]}});
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::Base64(_))
    ));

    let mut v = good.clone();
    v["packings"] = json!([{"__ndarray__": "AAAAAAAA8D8=", "dtype": "float64", "shape": [2]}]);
    assert!(matches!(
        from_str::<IndexedDcel>(&v.to_string()),
        Err(SerializationError::Shape { .. })
    ));

    // A structural error inside an entry names the missing field.
    let mut v = good;
    v["packings"] = json!([{"dtype": "float64", "shape": [1]}]);
    match from_str::<IndexedDcel>(&v.to_string()) {
        Err(SerializationError::Json(e)) => assert!(e.to_string().contains("__ndarray__"), "{e}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reserved_metadata_keys_override_defaults() {
    let (d, _, _) = one_holed_torus(5, 5).unwrap();
    let id = IndexedDcel::new(d).unwrap();
    let extra = BTreeMap::from([
        ("schema_version".to_string(), json!("9.9")),
        ("timestamp".to_string(), json!(17)),
        ("note".to_string(), json!("ünïcode")),
    ]);
    let doc = Document::new(&id, None, None, extra);
    assert_eq!(doc.metadata.schema_version, "9.9");
    assert!(doc.metadata.timestamp.ends_with('Z'));
    assert_eq!(doc.metadata.extra.keys().collect::<Vec<_>>(), ["note"]);

    let back: Loaded<IndexedDcel> = from_str(&to_string(&doc).unwrap()).unwrap();
    assert_eq!(back.metadata, doc.metadata);
}

#[test]
fn path_store_compresses_and_refuses_to_clobber() {
    let dir = tempfile::tempdir().unwrap();
    let (id, chains, packs) = genus_two_bundle();
    let doc = Document::new(&id, Some(&chains), Some(&packs), BTreeMap::new());

    let cpz = dir.path().join("g2.CPZ");
    store(&cpz, &doc, StoreOptions::default()).unwrap();
    let bytes = std::fs::read(&cpz).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    let back: Loaded<InterstitialDcel> = load(&cpz, false).unwrap();
    assert_eq!(back.packings.as_ref(), Some(&packs));

    assert!(matches!(
        store(&cpz, &doc, StoreOptions::default()),
        Err(SerializationError::Exists(_))
    ));
    let opts = StoreOptions {
        clobber: true,
        ..StoreOptions::default()
    };
    store(&cpz, &doc, opts).unwrap();

    let cpj = dir.path().join("g2.cpj");
    store(&cpj, &doc, StoreOptions::default()).unwrap();
    assert_eq!(std::fs::read(&cpj).unwrap()[0], b'{');
    let back: Loaded<IndexedDcel> = load(&cpj, false).unwrap();
    assert_eq!(back.mesh.uuid(), id.indexed().uuid());

    let forced = dir.path().join("g2.json");
    let opts = StoreOptions {
        force_compression: true,
        ..StoreOptions::default()
    };
    store(&forced, &doc, opts).unwrap();
    assert!(load::<IndexedDcel>(&forced, false).is_err());
    assert!(load::<IndexedDcel>(&forced, true).is_ok());
}
