//! Patch tests: elements that reproduce constant strain states exactly

use approx::assert_relative_eq;
use fem_engine::prelude::*;

/// Tributary weight of a grid coordinate on a loaded edge or face
fn edge_weight(coord: f64, length: f64) -> f64 {
    if coord.abs() < 1e-9 || (coord - length).abs() < 1e-9 {
        1.0
    } else {
        2.0
    }
}

#[test]
fn cst_reproduces_enforced_linear_field() {
    let ux = |n: &Node| 1e-3 * n.x + 2e-3 * n.y;
    let uy = |n: &Node| -5e-4 * n.x + 1e-3 * n.y;

    let spec = MeshSpec::TriangleGrid {
        nx: 2,
        ny: 2,
        width: 1.0,
        height: 1.0,
    };
    let mesh = spec.generate().unwrap();
    let on_boundary = |n: &Node| n.x == 0.0 || n.x == 1.0 || n.y == 0.0 || n.y == 1.0;

    let mut supports = Vec::new();
    for i in mesh.nodes_where(on_boundary) {
        let node = mesh.nodes[i];
        supports.push(Support::components(i, &[0]).with_value(ux(&node)));
        supports.push(Support::components(i, &[1]).with_value(uy(&node)));
    }

    let config = AnalysisConfig {
        family: ElementFamily::Cst,
        mesh: spec,
        material: Material::new(1e3, 0.3),
        section: Section::plate(1.0),
        supports,
        loads: vec![],
        options: AnalysisOptions::default(),
    };
    let analysis = config.run().unwrap();

    let interior = mesh.nodes_where(|n| !on_boundary(n));
    assert_eq!(interior.len(), 1);
    let centre = analysis.node_displacement(interior[0]).unwrap();
    let node = mesh.nodes[interior[0]];
    assert_relative_eq!(centre.values[0], ux(&node), epsilon = 1e-12);
    assert_relative_eq!(centre.values[1], uy(&node), epsilon = 1e-12);

    for response in analysis.element_responses() {
        let strain = response.strain();
        assert_relative_eq!(strain[0], 1e-3, epsilon = 1e-12);
        assert_relative_eq!(strain[1], 1e-3, epsilon = 1e-12);
        assert_relative_eq!(strain[2], 1.5e-3, epsilon = 1e-12);
    }
}

#[test]
fn quad_uniaxial_tension() {
    let (width, height, thickness) = (3.0, 2.0, 0.5);
    let (e, nu, total) = (1000.0, 0.25, 12.0);

    let spec = MeshSpec::QuadGrid {
        nx: 3,
        ny: 2,
        width,
        height,
    };
    let mesh = spec.generate().unwrap();

    let mut supports: Vec<Support> = mesh
        .nodes_on_plane(0, 0.0)
        .into_iter()
        .map(|n| Support::components(n, &[0]))
        .collect();
    let origin = mesh.nodes_where(|n| n.x == 0.0 && n.y == 0.0)[0];
    supports.push(Support::components(origin, &[1]));

    let right = mesh.nodes_on_plane(0, width);
    let weights: f64 = right
        .iter()
        .map(|&n| edge_weight(mesh.nodes[n].y, height))
        .sum();
    let loads = right
        .iter()
        .map(|&n| NodeLoad::new(n, 0, total * edge_weight(mesh.nodes[n].y, height) / weights))
        .collect();

    let config = AnalysisConfig {
        family: ElementFamily::Quad4,
        mesh: spec,
        material: Material::new(e, nu),
        section: Section::plate(thickness),
        supports,
        loads,
        options: AnalysisOptions::default(),
    };
    let analysis = config.run().unwrap();

    let sigma = total / (height * thickness);
    for &n in &right {
        let u = analysis.node_displacement(n).unwrap();
        assert_relative_eq!(u.values[0], sigma / e * width, max_relative = 1e-9);
    }
    for n in mesh.nodes_on_plane(1, height) {
        let u = analysis.node_displacement(n).unwrap();
        assert_relative_eq!(u.values[1], -nu * sigma / e * height, max_relative = 1e-9);
    }
    for response in analysis.element_responses() {
        let stress = response.stress();
        assert_relative_eq!(stress[0], sigma, max_relative = 1e-9);
        assert!(stress[1].abs() < 1e-9 * sigma);
        assert!(stress[2].abs() < 1e-9 * sigma);
    }
}

#[test]
fn hex_uniaxial_tension() {
    let length = 2.0;
    let (e, nu, total) = (2e5, 0.3, 1600.0);

    let spec = MeshSpec::HexGrid {
        nx: 2,
        ny: 2,
        nz: 2,
        lx: length,
        ly: length,
        lz: length,
    };
    let mesh = spec.generate().unwrap();

    // Symmetry planes
    let mut supports = Vec::new();
    for axis in 0..3 {
        for n in mesh.nodes_on_plane(axis, 0.0) {
            supports.push(Support::components(n, &[axis]));
        }
    }

    let face = mesh.nodes_on_plane(0, length);
    let weight = |n: usize| {
        let node = mesh.nodes[n];
        edge_weight(node.y, length) * edge_weight(node.z, length)
    };
    let weights: f64 = face.iter().map(|&n| weight(n)).sum();
    assert_relative_eq!(weights, 16.0);
    let loads = face
        .iter()
        .map(|&n| NodeLoad::new(n, 0, total * weight(n) / weights))
        .collect();

    let config = AnalysisConfig {
        family: ElementFamily::Hex8,
        mesh: spec,
        material: Material::new(e, nu),
        section: Section::default(),
        supports,
        loads,
        options: AnalysisOptions::default(),
    };
    let analysis = config.run().unwrap();

    let sigma = total / (length * length);
    let axial = sigma / e * length;
    let lateral = -nu * sigma / e * length;
    for &n in &face {
        let u = analysis.node_displacement(n).unwrap();
        assert_relative_eq!(u.values[0], axial, max_relative = 1e-8);
    }
    for n in mesh.nodes_on_plane(1, length) {
        let u = analysis.node_displacement(n).unwrap();
        assert_relative_eq!(u.values[1], lateral, max_relative = 1e-8);
    }
    for n in mesh.nodes_on_plane(2, length) {
        let u = analysis.node_displacement(n).unwrap();
        assert_relative_eq!(u.values[2], lateral, max_relative = 1e-8);
    }

    for response in analysis.element_responses() {
        let stress = response.stress();
        assert_relative_eq!(stress[0], sigma, max_relative = 1e-8);
        for s in &stress[1..] {
            assert!(s.abs() < 1e-8 * sigma, "unexpected stress component {s}");
        }
        assert_relative_eq!(response.von_mises(), sigma, max_relative = 1e-8);
    }
}

#[test]
fn distorted_hex_reproduces_enforced_linear_field() {
    let ux = |n: &Node| 1e-3 * n.x + 2e-4 * n.y - 1e-4 * n.z;
    let uy = |n: &Node| -3e-4 * n.x + 5e-4 * n.y + 2e-4 * n.z;
    let uz = |n: &Node| 3e-4 * n.x - 1e-4 * n.y + 4e-4 * n.z;
    let expected = [1e-3, 5e-4, 4e-4, -1e-4, 1e-4, 2e-4];

    let grid = MeshSpec::HexGrid {
        nx: 2,
        ny: 2,
        nz: 2,
        lx: 1.0,
        ly: 1.0,
        lz: 1.0,
    }
    .generate()
    .unwrap();
    let on_boundary = |n: &Node| {
        n.coords()
            .iter()
            .any(|&c| c.abs() < 1e-12 || (c - 1.0).abs() < 1e-12)
    };
    let interior = grid.nodes_where(|n| !on_boundary(n));
    assert_eq!(interior.len(), 1);
    let centre = interior[0];

    // Pull the shared centre node off the grid so no element is a box
    let mut nodes = grid.nodes.clone();
    nodes[centre] = Node::new(0.61, 0.42, 0.57);

    let mut supports = Vec::new();
    for (i, node) in nodes.iter().enumerate().filter(|(_, n)| on_boundary(*n)) {
        supports.push(Support::components(i, &[0]).with_value(ux(node)));
        supports.push(Support::components(i, &[1]).with_value(uy(node)));
        supports.push(Support::components(i, &[2]).with_value(uz(node)));
    }

    let moved = nodes[centre];
    let config = AnalysisConfig {
        family: ElementFamily::Hex8,
        mesh: MeshSpec::Explicit {
            nodes,
            elements: grid.elements.clone(),
        },
        material: Material::new(2e5, 0.3),
        section: Section::default(),
        supports,
        loads: vec![],
        options: AnalysisOptions::default(),
    };
    let analysis = config.run().unwrap();

    let u = analysis.node_displacement(centre).unwrap();
    assert_relative_eq!(u.values[0], ux(&moved), epsilon = 1e-12);
    assert_relative_eq!(u.values[1], uy(&moved), epsilon = 1e-12);
    assert_relative_eq!(u.values[2], uz(&moved), epsilon = 1e-12);

    assert_eq!(analysis.element_responses().len(), 8);
    for response in analysis.element_responses() {
        for (got, want) in response.strain().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }
}

#[test]
fn single_triangle_constant_strain() {
    let ux = |n: &Node| 2e-4 * n.x - 1e-4 * n.y + 1e-5;
    let uy = |n: &Node| 3e-4 * n.x + 5e-4 * n.y;
    let nodes = vec![
        Node::planar(0.0, 0.0),
        Node::planar(2.0, 0.0),
        Node::planar(0.5, 1.5),
    ];
    let supports = nodes
        .iter()
        .enumerate()
        .flat_map(|(i, n)| {
            [
                Support::components(i, &[0]).with_value(ux(n)),
                Support::components(i, &[1]).with_value(uy(n)),
            ]
        })
        .collect();

    let material = Material::new(2e5, 0.25);
    let config = AnalysisConfig {
        family: ElementFamily::Cst,
        mesh: MeshSpec::Explicit {
            nodes,
            elements: vec![vec![0, 1, 2]],
        },
        material,
        section: Section::plate(0.1),
        supports,
        loads: vec![],
        options: AnalysisOptions::default(),
    };
    let analysis = config.run().unwrap();

    let (ex, ey, gxy) = (2e-4, 5e-4, 2e-4);
    let response = analysis.element_response(0).unwrap();
    assert_relative_eq!(response.strain()[0], ex, epsilon = 1e-14);
    assert_relative_eq!(response.strain()[1], ey, epsilon = 1e-14);
    assert_relative_eq!(response.strain()[2], gxy, epsilon = 1e-14);

    let c = material.e / (1.0 - material.nu * material.nu);
    assert_relative_eq!(response.stress()[0], c * (ex + material.nu * ey), max_relative = 1e-9);
    assert_relative_eq!(response.stress()[1], c * (ey + material.nu * ex), max_relative = 1e-9);
    assert_relative_eq!(
        response.stress()[2],
        c * 0.5 * (1.0 - material.nu) * gxy,
        max_relative = 1e-9
    );
}

#[test]
fn unit_square_quad_reference_stiffness() {
    let (e, nu) = (1.0, 0.3);
    let config = AnalysisConfig {
        family: ElementFamily::Quad4,
        mesh: MeshSpec::Explicit {
            nodes: vec![
                Node::planar(0.0, 0.0),
                Node::planar(1.0, 0.0),
                Node::planar(1.0, 1.0),
                Node::planar(0.0, 1.0),
            ],
            elements: vec![vec![0, 1, 2, 3]],
        },
        material: Material::new(e, nu),
        section: Section::plate(1.0),
        supports: vec![Support::fixed(0), Support::components(1, &[1])],
        loads: vec![NodeLoad::new(2, 0, 1.0)],
        options: AnalysisOptions::default(),
    };
    let analysis = config.run().unwrap();

    // Hand-integrated 2x2 Gauss result for the unit square
    let c = e / (1.0 - nu * nu);
    let k = [
        0.5 - nu / 6.0,
        0.125 + nu / 8.0,
        -0.25 - nu / 12.0,
        -0.125 + 3.0 * nu / 8.0,
        -0.25 + nu / 12.0,
        -0.125 - nu / 8.0,
        nu / 6.0,
        0.125 - 3.0 * nu / 8.0,
    ];
    let local = analysis.element_stiffness(0).unwrap();
    assert_eq!(local.dofs, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    for (j, value) in k.iter().enumerate() {
        assert_relative_eq!(local.matrix[(0, j)], c * value, epsilon = 1e-12);
        assert_relative_eq!(analysis.stiffness_entry(0, j).unwrap(), c * value, epsilon = 1e-12);
    }
}
