//! Tests for ct-network.

use std::collections::BTreeSet;

use ct_core::LaneId;

const NET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>

<!-- generated by netconvert -->
<net version="1.16" junctionCornerDetail="5">
    <location netOffset="-500.00,-300.00" projParameter="+proj=utm +zone=16 +ellps=WGS84"/>
    <edge id="e1" from="J0" to="J1" priority="-1">
        <lane id="A" index="0" speed="13.89" length="100.00" shape="0.00,0.00 100.00,0.00"/>
        <lane id="B" index="1" allow="passenger bus" speed="13.89" length="100.00" shape="0.00,3.20 100.00,3.20"/>
    </edge>
    <edge id="e2" from="J1" to="J2" priority="-1">
        <lane id="C" index="0" disallow="pedestrian" speed="8.33" length="50.00" shape="100.00,0.00 150.00,0.00">
            <param key="origId" value="123"/>
        </lane>
    </edge>
    <junction id="J1" type="priority" x="100.00" y="0.00"/>
</net>
"#;

fn set(ids: &[&str]) -> BTreeSet<LaneId> {
    ids.iter().map(|s| LaneId::from(*s)).collect()
}

fn lane_lines(doc: &str) -> Vec<&str> {
    doc.lines().filter(|l| l.trim_start().starts_with("<lane")).collect()
}

#[cfg(test)]
mod mutator_tests {
    use super::*;
    use crate::{NetworkError, block_lanes};

    #[test]
    fn empty_set_is_identity() {
        assert_eq!(block_lanes(NET, &BTreeSet::new()).unwrap(), NET);
    }

    #[test]
    fn only_selected_lane_changes() {
        let out = block_lanes(NET, &set(&["A"])).unwrap();
        let before = lane_lines(NET);
        let after = lane_lines(&out);
        assert_eq!(
            after[0].trim(),
            r#"<lane id="A" index="0" speed="13.89" length="100.00" shape="0.00,0.00 100.00,0.00" disallow="all"/>"#
        );
        assert_eq!(after[1], before[1]);
        assert_eq!(after[2], before[2]);
        // everything outside the rewritten tag is byte-identical
        let (head, _) = NET.split_once(r#"<lane id="A""#).unwrap();
        assert!(out.starts_with(head));
        let (_, tail) = NET.split_once("shape=\"0.00,0.00 100.00,0.00\"/>").unwrap();
        assert!(out.ends_with(tail));
    }

    #[test]
    fn allow_list_replaced_by_disallow_all() {
        let out = block_lanes(NET, &set(&["B"])).unwrap();
        let b = lane_lines(&out)[1].trim();
        assert!(!b.contains("allow=\"passenger bus\""));
        assert!(b.contains(r#"disallow="all""#));
        assert!(b.ends_with("/>"));
    }

    #[test]
    fn existing_disallow_overwritten_in_place_and_children_kept() {
        let out = block_lanes(NET, &set(&["C"])).unwrap();
        assert!(out.contains(
            r#"<lane id="C" index="0" disallow="all" speed="8.33" length="50.00" shape="100.00,0.00 150.00,0.00">"#
        ));
        assert!(out.contains(r#"<param key="origId" value="123"/>"#));
        assert_eq!(out.matches("disallow=").count(), 1);
    }

    #[test]
    fn unknown_lane_ids_are_ignored() {
        assert_eq!(block_lanes(NET, &set(&["nope", ":J1_0_0"])).unwrap(), NET);
    }

    #[test]
    fn content_after_root_kept() {
        let doc = "<net><edge id=\"e\"><lane id=\"A\"/></edge></net>\n<!-- tail -->\n";
        assert_eq!(block_lanes(doc, &BTreeSet::new()).unwrap(), doc);
        assert_eq!(
            block_lanes(doc, &set(&["A"])).unwrap(),
            "<net><edge id=\"e\"><lane id=\"A\" disallow=\"all\"/></edge></net>\n<!-- tail -->\n"
        );
    }

    #[test]
    fn trailing_newline_kept() {
        assert!(NET.ends_with("</net>\n"));
        assert!(block_lanes(NET, &set(&["A"])).unwrap().ends_with("</net>\n"));
    }

    #[test]
    fn blocking_is_deterministic() {
        let lanes = set(&["A", "C"]);
        assert_eq!(block_lanes(NET, &lanes).unwrap(), block_lanes(NET, &lanes).unwrap());
    }

    #[test]
    fn blocking_twice_is_stable() {
        let lanes = set(&["A", "B", "C"]);
        let once = block_lanes(NET, &lanes).unwrap();
        let twice = block_lanes(&once, &lanes).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn lanes_outside_edges_untouched() {
        let doc = r#"<net><lane id="A"/><edge id="e"><lane id="A"/></edge></net>"#;
        let out = block_lanes(doc, &set(&["A"])).unwrap();
        assert_eq!(out, r#"<net><lane id="A"/><edge id="e"><lane id="A" disallow="all"/></edge></net>"#);
    }

    #[test]
    fn mismatched_tags_rejected() {
        let doc = "<net><edge id=\"e\"></lane></net>";
        assert!(matches!(block_lanes(doc, &set(&["A"])), Err(NetworkError::Xml(_))));
    }

    #[test]
    fn unclosed_root_rejected() {
        let doc = "<net><edge id=\"e\">";
        assert!(block_lanes(doc, &BTreeSet::new()).is_err());
    }

    #[test]
    fn empty_document_rejected() {
        assert!(matches!(
            block_lanes("   ", &BTreeSet::new()),
            Err(NetworkError::Malformed(_))
        ));
    }
}

#[cfg(test)]
mod rewrite_tests {
    use crate::{count_references, point_at};

    const CFG: &str = r#"<configuration>
    <input>
        <net-file value="net.xml.gz"/>
        <route-files value="osm.passenger.trips.xml"/>
    </input>
</configuration>
"#;

    #[test]
    fn single_anchor_replaced() {
        let out = point_at(CFG, "net.xml.gz", "updated_net.xml.gz");
        assert_eq!(count_references(&out, r#""net.xml.gz""#), 0);
        assert_eq!(count_references(&out, "updated_net.xml.gz"), 1);
        assert_eq!(out, CFG.replace(r#"value="net.xml.gz""#, r#"value="updated_net.xml.gz""#));
    }

    #[test]
    fn missing_anchor_leaves_text_unchanged() {
        assert_eq!(point_at(CFG, "other.net.xml", "x.net.xml"), CFG);
    }

    #[test]
    fn empty_reference_counts_nothing() {
        assert_eq!(count_references(CFG, ""), 0);
        assert_eq!(point_at(CFG, "", "x"), CFG);
    }
}

#[cfg(test)]
mod io_tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;
    use crate::{block_lanes_file, read_network, rewrite_config_file, write_network};

    #[test]
    fn gzip_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("osm.net.xml.gz");
        write_network(&path, NET).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
        let mut text = String::new();
        GzDecoder::new(raw.as_slice()).read_to_string(&mut text).unwrap();
        assert_eq!(text, NET);
        assert_eq!(read_network(&path).unwrap(), NET);
    }

    #[test]
    fn plain_network_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("osm.net.xml");
        write_network(&path, NET).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), NET);
        assert_eq!(read_network(&path).unwrap(), NET);
    }

    #[test]
    fn block_lanes_file_leaves_source_intact() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("osm.net.xml.gz");
        let dst = dir.path().join("updated_net.xml.gz");
        write_network(&src, NET).unwrap();

        block_lanes_file(&src, &dst, &set(&["A"])).unwrap();
        assert_eq!(read_network(&src).unwrap(), NET);
        let mutated = read_network(&dst).unwrap();
        assert_eq!(mutated.matches(r#"disallow="all""#).count(), 1);
    }

    #[test]
    fn rewrite_config_file_reports_replacements() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("osm.sumocfg");
        let dst = dir.path().join("updated_osm.sumocfg");
        std::fs::write(&src, r#"<net-file value="osm.net.xml.gz"/>"#).unwrap();

        let n = rewrite_config_file(&src, &dst, "osm.net.xml.gz", "updated_net.xml.gz").unwrap();
        assert_eq!(n, 1);
        assert_eq!(
            std::fs::read_to_string(&dst).unwrap(),
            r#"<net-file value="updated_net.xml.gz"/>"#
        );
    }

    #[test]
    fn missing_network_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_network(&dir.path().join("absent.net.xml.gz")),
            Err(crate::NetworkError::Io(_))
        ));
    }
}
