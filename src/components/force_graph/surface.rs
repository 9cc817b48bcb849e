use web_sys::{Document, Element};

use crate::config::{ARROW_REF_X, NODE_RADIUS};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Drawing target for one graph.
///
/// Shapes are created once per render and afterwards only moved.
pub trait Surface {
	type Shape;

	/// Remove every shape and marker from the surface.
	fn clear(&mut self);
	fn set_size(&mut self, width: f64, height: f64);
	fn define_arrow_marker(&mut self);
	fn add_link(&mut self, directed: bool) -> Self::Shape;
	fn add_node(&mut self) -> Self::Shape;
	fn add_node_label(&mut self, text: &str) -> Self::Shape;
	fn add_weight_label(&mut self, text: &str) -> Self::Shape;
	fn move_link(&mut self, shape: &Self::Shape, from: (f64, f64), to: (f64, f64));
	fn move_node(&mut self, shape: &Self::Shape, at: (f64, f64));
	fn move_label(&mut self, shape: &Self::Shape, at: (f64, f64));
}

/// An `<svg>` element in the live document.
pub struct SvgSurface {
	document: Document,
	root: Element,
	layers: Layers,
	/// Marker ids are document-global, so each surface gets its own.
	arrow_id: String,
}

/// Groups in paint order: links under nodes under labels.
struct Layers {
	links: Element,
	nodes: Element,
	labels: Element,
	weights: Element,
}

impl Layers {
	fn build(document: &Document, root: &Element) -> Self {
		let group = |class: &str| {
			let g = create(document, "g");
			let _ = g.set_attribute("class", class);
			let _ = root.append_child(&g);
			g
		};
		Self {
			links: group("links"),
			nodes: group("nodes"),
			labels: group("labels"),
			weights: group("weights"),
		}
	}
}

fn create(document: &Document, tag: &str) -> Element {
	document
		.create_element_ns(Some(SVG_NS), tag)
		.unwrap_or_else(|_| panic!("cannot create svg <{tag}>"))
}

fn set_f64(el: &Element, name: &str, value: f64) {
	let _ = el.set_attribute(name, &value.to_string());
}

impl SvgSurface {
	/// Bind to the element matching `selector`, discarding its contents.
	///
	/// Panics when the host page lacks the element.
	pub fn bind(selector: &str) -> Self {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.expect("no document on window");
		let root = document
			.query_selector(selector)
			.ok()
			.flatten()
			.unwrap_or_else(|| panic!("graph surface {selector} not found"));
		root.set_inner_html("");
		let layers = Layers::build(&document, &root);
		let arrow_id = format!("{}-arrow", root.id());
		Self {
			document,
			root,
			layers,
			arrow_id,
		}
	}

	/// Convert client coordinates to surface coordinates.
	pub fn local_point(&self, client_x: f64, client_y: f64) -> (f64, f64) {
		let rect = self.root.get_bounding_client_rect();
		(client_x - rect.left(), client_y - rect.top())
	}

	pub fn is_attached(&self) -> bool {
		self.root.is_connected()
	}

	fn create(&self, tag: &str) -> Element {
		create(&self.document, tag)
	}

	fn text(&self, class: &str, text: &str) -> Element {
		let el = self.create("text");
		let _ = el.set_attribute("class", class);
		let _ = el.set_attribute("dy", ".35em");
		let _ = el.set_attribute("text-anchor", "middle");
		el.set_text_content(Some(text));
		el
	}
}

impl Surface for SvgSurface {
	type Shape = Element;

	fn clear(&mut self) {
		self.root.set_inner_html("");
		self.layers = Layers::build(&self.document, &self.root);
	}

	fn set_size(&mut self, width: f64, height: f64) {
		set_f64(&self.root, "width", width);
		set_f64(&self.root, "height", height);
	}

	fn define_arrow_marker(&mut self) {
		let defs = self.create("defs");
		let marker = self.create("marker");
		for (name, value) in [
			("id", self.arrow_id.as_str()),
			("viewBox", "0 -10 20 20"),
			("refY", "0"),
			("markerWidth", "6"),
			("markerHeight", "6"),
			("orient", "auto"),
		] {
			let _ = marker.set_attribute(name, value);
		}
		set_f64(&marker, "refX", ARROW_REF_X);
		let path = self.create("path");
		let _ = path.set_attribute("d", "M0,-10L10,0L0,10L2,0Z");
		let _ = path.set_attribute("fill", "#000");
		let _ = marker.append_child(&path);
		let _ = defs.append_child(&marker);
		let _ = self.root.append_child(&defs);
	}

	fn add_link(&mut self, directed: bool) -> Element {
		let line = self.create("line");
		let _ = line.set_attribute("class", "link");
		let _ = line.set_attribute("stroke", "#999");
		let _ = line.set_attribute("stroke-width", "2");
		if directed {
			let _ = line.set_attribute("marker-end", &format!("url(#{})", self.arrow_id));
		}
		let _ = self.layers.links.append_child(&line);
		line
	}

	fn add_node(&mut self) -> Element {
		let circle = self.create("circle");
		let _ = circle.set_attribute("class", "node");
		set_f64(&circle, "r", NODE_RADIUS);
		let _ = circle.set_attribute("fill", "green");
		let _ = self.layers.nodes.append_child(&circle);
		circle
	}

	fn add_node_label(&mut self, text: &str) -> Element {
		let label = self.text("label", text);
		let _ = label.set_attribute("fill", "white");
		let _ = label.set_attribute("font-size", "12px");
		let _ = self.layers.labels.append_child(&label);
		label
	}

	fn add_weight_label(&mut self, text: &str) -> Element {
		let label = self.text("weight", text);
		let _ = label.set_attribute("fill", "#000");
		let _ = label.set_attribute("font-size", "10px");
		let _ = self.layers.weights.append_child(&label);
		label
	}

	fn move_link(&mut self, shape: &Element, from: (f64, f64), to: (f64, f64)) {
		set_f64(shape, "x1", from.0);
		set_f64(shape, "y1", from.1);
		set_f64(shape, "x2", to.0);
		set_f64(shape, "y2", to.1);
	}

	fn move_node(&mut self, shape: &Element, at: (f64, f64)) {
		set_f64(shape, "cx", at.0);
		set_f64(shape, "cy", at.1);
	}

	fn move_label(&mut self, shape: &Element, at: (f64, f64)) {
		set_f64(shape, "x", at.0);
		set_f64(shape, "y", at.1);
	}
}
