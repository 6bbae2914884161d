pub mod heuristic_face_gate;
