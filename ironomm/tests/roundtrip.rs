/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Cross-crate round-trip coverage: entry portability between container
//! instances, nesting across the container/message boundary, and
//! clear-then-reuse equivalence.

use bytes::Bytes;
use ironomm::prelude::*;

fn sample_field_list() -> Bytes {
    let mut fl = FieldList::new();
    fl.add(22, &OmmData::Real(OmmReal::new(3990, MagnitudeType::ExponentNeg2)))
        .unwrap();
    fl.add(25, &OmmData::Real(OmmReal::new(3994, MagnitudeType::ExponentNeg2)))
        .unwrap();
    fl.add(3, &OmmData::Ascii("TRI.N".to_string())).unwrap();
    fl.encode().unwrap()
}

fn sample_element_list() -> Bytes {
    let mut el = ElementList::new();
    el.add("Name", &OmmData::Ascii("value".to_string())).unwrap();
    el.add("Count", &OmmData::UInt(3)).unwrap();
    el.encode().unwrap()
}

fn sample_map() -> Bytes {
    let mut map = Map::new();
    map.add(
        MapEntry::new(
            OmmData::Buffer(Bytes::from_static(b"k1")),
            MapAction::Add,
            &OmmData::Container(DataType::FieldList, sample_field_list()),
        )
        .unwrap(),
    )
    .unwrap();
    map.encode().unwrap()
}

fn payload_kinds() -> Vec<(DataType, Bytes)> {
    vec![
        (DataType::FieldList, sample_field_list()),
        (DataType::ElementList, sample_element_list()),
        (DataType::Map, sample_map()),
    ]
}

#[test]
fn vector_entry_portability_across_payload_kinds() {
    for (data_type, payload) in payload_kinds() {
        let mut source = Vector::new();
        source
            .add(
                VectorEntry::new(
                    2,
                    VectorAction::Insert,
                    &OmmData::Container(data_type, payload),
                )
                .unwrap()
                .with_perm_data(Bytes::from_static(&[0x12, 0x34])),
            )
            .unwrap();
        let decoded = Vector::decode(source.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();

        let mut target = Vector::new();
        target.add(entry.clone()).unwrap();
        let target_decoded = Vector::decode(target.encode().unwrap()).unwrap();
        assert_eq!(target_decoded.iter().next().unwrap(), &entry);
    }
}

#[test]
fn series_entry_portability_across_payload_kinds() {
    for (data_type, payload) in payload_kinds() {
        let mut source = Series::new();
        source
            .add(SeriesEntry::new(&OmmData::Container(data_type, payload)).unwrap())
            .unwrap();
        let decoded = Series::decode(source.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();

        let mut target = Series::new();
        target.add(entry.clone()).unwrap();
        let target_decoded = Series::decode(target.encode().unwrap()).unwrap();
        assert_eq!(target_decoded.iter().next().unwrap(), &entry);
    }
}

#[test]
fn filter_entry_portability_across_payload_kinds() {
    for (data_type, payload) in payload_kinds() {
        let mut source = FilterList::new();
        source.add(
            FilterEntry::new(
                7,
                FilterAction::Set,
                &OmmData::Container(data_type, payload),
            )
            .unwrap()
            .with_perm_data(Bytes::from_static(&[0xAB])),
        );
        let decoded = FilterList::decode(source.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();

        let mut target = FilterList::new();
        target.add(entry.clone());
        let target_decoded = FilterList::decode(target.encode().unwrap()).unwrap();
        assert_eq!(target_decoded.iter().next().unwrap(), &entry);
    }
}

#[test]
fn map_entry_portability() {
    let mut source = Map::new();
    source.set_key_field_id(3);
    source
        .add(
            MapEntry::new(
                OmmData::Ascii("ABCD".to_string()),
                MapAction::Add,
                &OmmData::Container(DataType::FieldList, sample_field_list()),
            )
            .unwrap(),
        )
        .unwrap();
    let decoded = Map::decode(source.encode().unwrap()).unwrap();
    let entry = decoded.iter().next().unwrap().clone();

    let mut target = Map::new();
    target.add(entry.clone()).unwrap();
    let target_decoded = Map::decode(target.encode().unwrap()).unwrap();
    assert_eq!(target_decoded.iter().next().unwrap(), &entry);
    assert_eq!(target_decoded.key_type(), DataType::AsciiString);
}

#[test]
fn message_nested_in_vector_in_map() {
    let mut inner = RefreshMsg::new();
    inner.set_stream_id(6);
    inner.set_state(State::new(StreamState::Open, DataState::Ok).with_text("Item Refresh Completed"));
    inner.set_refresh_complete(true);
    inner
        .set_payload(DataType::FieldList, sample_field_list())
        .unwrap();

    let mut vector = Vector::new();
    vector
        .add(
            VectorEntry::new(
                0,
                VectorAction::Set,
                &OmmData::Container(DataType::Msg, inner.encode().unwrap()),
            )
            .unwrap(),
        )
        .unwrap();

    let mut map = Map::new();
    map.add(
        MapEntry::new(
            OmmData::UInt(1),
            MapAction::Add,
            &OmmData::Container(DataType::Vector, vector.encode().unwrap()),
        )
        .unwrap(),
    )
    .unwrap();

    let decoded_map = Map::decode(map.encode().unwrap()).unwrap();
    let map_entry = decoded_map.iter().next().unwrap();
    assert_eq!(map_entry.data_type, DataType::Vector);

    let decoded_vector = Vector::decode(map_entry.data.clone()).unwrap();
    let vector_entry = decoded_vector.iter().next().unwrap();
    assert_eq!(vector_entry.data_type, DataType::Msg);

    let Msg::Refresh(decoded_msg) = Msg::decode(vector_entry.data.clone()).unwrap() else {
        panic!("expected a refresh message");
    };
    assert_eq!(decoded_msg, inner);
    assert_eq!(decoded_msg.state().status_text, "Item Refresh Completed");
}

#[test]
fn container_as_message_attrib_preserves_type() {
    let mut key = MsgKey::new();
    key.set_name("GENERIC");
    key.set_attrib(DataType::ElementList, sample_element_list())
        .unwrap();

    let mut msg = GenericMsg::new();
    msg.set_stream_id(3);
    msg.set_msg_key(key);
    msg.set_payload(DataType::Series, {
        let mut series = Series::new();
        series
            .add(
                SeriesEntry::new(&OmmData::Container(DataType::FieldList, sample_field_list()))
                    .unwrap(),
            )
            .unwrap();
        series.encode().unwrap()
    })
    .unwrap();

    let decoded = GenericMsg::decode(msg.encode().unwrap()).unwrap();
    let (attrib_type, attrib_bytes) = decoded.msg_key().attrib();
    assert_eq!(attrib_type, DataType::ElementList);
    let attrib = ElementList::decode(attrib_bytes).unwrap();
    assert_eq!(attrib.len(), 2);

    let (payload_type, payload_bytes) = decoded.payload();
    assert_eq!(payload_type, DataType::Series);
    assert_eq!(Series::decode(payload_bytes).unwrap().len(), 1);
}

#[test]
fn clear_then_reuse_matches_fresh_instance() {
    let mut reused = Vector::new();
    reused
        .set_summary_data(DataType::ElementList, sample_element_list())
        .unwrap();
    reused
        .add(
            VectorEntry::new(
                1,
                VectorAction::Update,
                &OmmData::Container(DataType::ElementList, sample_element_list()),
            )
            .unwrap(),
        )
        .unwrap();
    reused.clear();

    let mut fresh = Vector::new();
    for v in [&mut reused, &mut fresh] {
        v.add(
            VectorEntry::new(
                4,
                VectorAction::Set,
                &OmmData::Container(DataType::FieldList, sample_field_list()),
            )
            .unwrap(),
        )
        .unwrap();
    }
    assert_eq!(reused.encode().unwrap(), fresh.encode().unwrap());
}

#[test]
fn dictionary_resolves_field_values() {
    let mut dictionary = FieldDictionary::new();
    dictionary.add_field(FieldDef::new(22, "BID", DataType::Real));
    dictionary.add_field(FieldDef::new(25, "ASK", DataType::Real));
    dictionary.add_field(FieldDef::new(3, "DSPLY_NAME", DataType::AsciiString));

    let decoded = FieldList::decode(sample_field_list()).unwrap();
    let mut values = Vec::new();
    for entry in decoded.iter() {
        values.push(entry.value(&dictionary).unwrap());
    }
    assert_eq!(
        values[0],
        OmmData::Real(OmmReal::new(3990, MagnitudeType::ExponentNeg2))
    );
    assert_eq!(values[2], OmmData::Ascii("TRI.N".to_string()));
}

#[test]
fn rmtes_field_resolves_through_buffer() {
    let mut fl = FieldList::new();
    fl.add(
        260,
        &OmmData::Rmtes(Bytes::from_static(b"abcdefghijkl")),
    )
    .unwrap();
    let decoded = FieldList::decode(fl.encode().unwrap()).unwrap();
    let entry = decoded.iter().next().unwrap();

    let mut buf = RmtesBuffer::new();
    buf.apply(&entry.data).unwrap();
    buf.apply(&[0x1B, 0x5B, 0x30, 0x60, 0x31, 0x32]).unwrap();
    assert_eq!(buf.as_utf8(), "12cdefghijkl");
}
